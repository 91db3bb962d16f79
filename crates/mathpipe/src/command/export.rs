use super::read_input;
use anyhow::{Context, Result};
use clap::Parser;
use mathpipe_config::Config;
use mathpipe_core::{export_document, DirectoryHost, ExportOptions, RecognitionMode};
use std::path::PathBuf;

/// Export a recognition result as a PDF file.
#[derive(Parser, Debug, Clone)]
pub struct Export {
    /// Recognition mode of the content: formula, ocr or document.
    #[clap(long)]
    pub mode: RecognitionMode,

    /// Directory to write the PDF to, overrides the configured one.
    #[clap(long)]
    pub output_dir: Option<PathBuf>,

    /// Body font size in points, overrides the configured one.
    #[clap(long)]
    pub font_size: Option<f32>,

    /// File holding the content, read from stdin when omitted.
    pub file: Option<PathBuf>,
}

impl Export {
    pub async fn run(self, config: &Config) -> Result<()> {
        let content = read_input(self.file.as_deref()).await?;

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| config.export.output_dir());
        let options = ExportOptions {
            font_size: self.font_size.unwrap_or(config.export.font_size),
        };

        let host = DirectoryHost::new(&output_dir);
        let artifact = export_document(&host, &content, self.mode, &options)
            .await
            .with_context(|| format!("failed to export to {}", output_dir.display()))?;

        println!("{}", artifact.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_export_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("formula.txt");
        std::fs::write(&input, r"\int_0^1 x \, dx").unwrap();
        let output_dir = dir.path().join("out");

        Export {
            mode: RecognitionMode::Formula,
            output_dir: Some(output_dir.clone()),
            font_size: None,
            file: Some(input),
        }
        .run(&Config::default())
        .await
        .unwrap();

        let entries: Vec<_> = std::fs::read_dir(&output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("formula_"));
        assert!(entries[0].ends_with(".pdf"));
    }
}
