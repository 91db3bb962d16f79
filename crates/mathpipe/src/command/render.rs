use super::{read_input, visual_renderer};
use anyhow::{Context, Result};
use clap::Parser;
use mathpipe_config::Config;
use mathpipe_core::MixedRenderer;
use std::path::PathBuf;

/// Render a document mixing prose and `$`/`$$` math to HTML.
#[derive(Parser, Debug, Clone)]
pub struct Render {
    /// Write the HTML to this file instead of stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Input document, read from stdin when omitted.
    pub file: Option<PathBuf>,
}

impl Render {
    pub async fn run(self, config: &Config) -> Result<()> {
        let doc = read_input(self.file.as_deref()).await?;

        let renderer = MixedRenderer::new(visual_renderer(&config.render))
            .with_block_class(config.render.block_class.clone());
        let html = renderer.render(&doc);

        tracing::debug!(input = doc.len(), output = html.len(), "Rendered document");

        match self.output {
            Some(path) => tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => println!("{html}"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathpipe_config::RenderConfig;

    #[tokio::test]
    async fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        let output = dir.path().join("doc.html");
        std::fs::write(&input, "# Result\nvalue $x$").unwrap();

        let config = Config {
            render: RenderConfig {
                visual_delegate: false,
                block_class: "display".into(),
            },
            ..Default::default()
        };
        Render {
            output: Some(output.clone()),
            file: Some(input),
        }
        .run(&config)
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            r#"<h1>Result</h1><br>value <code class="math-fallback">x</code>"#
        );
    }
}
