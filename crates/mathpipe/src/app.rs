use crate::{command, logging};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum RunCmd {
    /// Convert a math expression into another notation.
    #[clap(name = "transpile")]
    Transpile(command::transpile::Transpile),
    /// Render a document mixing prose and math to HTML.
    #[clap(name = "render")]
    Render(command::render::Render),
    /// Export a recognition result as a PDF file.
    #[clap(name = "export")]
    Export(command::export::Export),
}

/// Global CLI arguments.
#[derive(Parser, Debug, Clone)]
pub struct Args {
    /// Enable the logging system, writing to this file.
    #[clap(long)]
    pub log: Option<PathBuf>,

    /// Specify the path of the config file.
    #[clap(long)]
    pub config_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[clap(name = "mathpipe", version)]
pub struct Mathpipe {
    #[clap(flatten)]
    pub args: Args,

    #[clap(subcommand)]
    pub cmd: RunCmd,
}

impl Mathpipe {
    pub async fn run(self) -> Result<()> {
        let (config, config_err) =
            mathpipe_config::load_config_on_startup(self.args.config_file.clone());

        // Keep the guard alive until the command finishes to flush the log file.
        let _guard = logging::init(self.args.log.clone(), &config.log)?;

        if let Some(err) = config_err {
            tracing::warn!(?err, "Failed to parse the config file, using the default config");
            eprintln!("warning: invalid config file, using the default config: {err}");
        }

        match self.cmd {
            RunCmd::Transpile(transpile) => transpile.run(config).await,
            RunCmd::Render(render) => render.run(config).await,
            RunCmd::Export(export) => export.run(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mathpipe_core::{NotationTarget, RecognitionMode};

    #[test]
    fn test_command_is_valid() {
        Mathpipe::command().debug_assert();
    }

    #[test]
    fn test_parse_transpile() {
        let mathpipe = Mathpipe::try_parse_from([
            "mathpipe",
            "--config-file",
            "/tmp/config.toml",
            "transpile",
            "--target",
            "typst",
            r"\frac{a}{b}",
        ])
        .unwrap();

        assert_eq!(
            mathpipe.args.config_file,
            Some(PathBuf::from("/tmp/config.toml"))
        );
        match mathpipe.cmd {
            RunCmd::Transpile(transpile) => {
                assert_eq!(transpile.target, Some(NotationTarget::Typst));
                assert_eq!(transpile.expr.as_deref(), Some(r"\frac{a}{b}"));
            }
            cmd => panic!("Unexpected command: {cmd:?}"),
        }
    }

    #[test]
    fn test_parse_export() {
        let mathpipe =
            Mathpipe::try_parse_from(["mathpipe", "export", "--mode", "OCR", "result.txt"])
                .unwrap();
        match mathpipe.cmd {
            RunCmd::Export(export) => {
                assert_eq!(export.mode, RecognitionMode::Ocr);
                assert_eq!(export.file, Some(PathBuf::from("result.txt")));
                assert!(export.output_dir.is_none());
            }
            cmd => panic!("Unexpected command: {cmd:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_target() {
        assert!(
            Mathpipe::try_parse_from(["mathpipe", "transpile", "--target", "word", "x"]).is_err()
        );
    }
}
