pub mod export;
pub mod render;
pub mod transpile;

use anyhow::{Context, Result};
use mathpipe_config::RenderConfig;
use mathpipe_core::VisualRenderer;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read the whole input from `path`, or from stdin when no path is given.
async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn visual_renderer(config: &RenderConfig) -> VisualRenderer {
    if config.visual_delegate {
        VisualRenderer::pulldown_latex()
    } else {
        VisualRenderer::unavailable()
    }
}
