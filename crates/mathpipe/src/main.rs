mod app;
mod command;
mod logging;

use app::Mathpipe;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mathpipe = Mathpipe::parse();

    if let Err(e) = mathpipe.run().await {
        eprintln!("error: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
