//! Export of recognition results as downloadable PDF documents.
//!
//! The export builds an [`ExportDocument`] (title, timestamp, blank line and
//! one block per content line), serializes it with [`pdf::write_pdf`] and
//! hands the bytes to a [`DownloadHost`] through a scoped [`ObjectUrl`].

mod host;
pub mod pdf;

use crate::RecognitionMode;
use chrono::{DateTime, Local, Utc};
use std::path::PathBuf;

pub use host::{Blob, DirectoryHost, DownloadHost, ObjectUrl, PDF_MIME_TYPE};
pub use pdf::PdfStyle;

pub const DEFAULT_FONT_SIZE: f32 = 12.0;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to build PDF: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("download failed: {0}")]
    Download(String),
}

/// Options for [`export_document`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Body font size in points.
    pub font_size: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// One laid out unit of an export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Title(&'a str),
    Text(&'a str),
    Blank,
}

/// Structured content of an exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub mode: RecognitionMode,
    pub title: String,
    /// `Generated at: <local time>`.
    pub generated_at: String,
    pub lines: Vec<String>,
}

impl ExportDocument {
    pub fn new(content: &str, mode: RecognitionMode) -> Self {
        Self::with_timestamp(content, mode, Local::now())
    }

    pub fn with_timestamp(content: &str, mode: RecognitionMode, at: DateTime<Local>) -> Self {
        Self {
            mode,
            title: mode.title().to_string(),
            generated_at: format!("Generated at: {}", at.format(TIMESTAMP_FORMAT)),
            lines: content.lines().map(ToString::to_string).collect(),
        }
    }

    /// Blocks in reading order.
    pub fn blocks(&self) -> Vec<Block<'_>> {
        let mut blocks = Vec::with_capacity(self.lines.len() + 3);
        blocks.push(Block::Title(&self.title));
        blocks.push(Block::Text(&self.generated_at));
        blocks.push(Block::Blank);
        blocks.extend(self.lines.iter().map(|line| Block::Text(line)));
        blocks
    }
}

/// A file written by [`export_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    pub file_name: String,
    pub path: PathBuf,
    /// Size in bytes.
    pub size: usize,
}

/// `<label>_<epoch-millis>.pdf`
pub fn export_file_name(mode: RecognitionMode, epoch_millis: i64) -> String {
    format!("{}_{epoch_millis}.pdf", mode.name())
}

/// Export `content` as a PDF file through `host`.
///
/// The object URL registered for the PDF bytes is revoked on every path,
/// including when the returned future is dropped before completion.
pub async fn export_document<H: DownloadHost + ?Sized>(
    host: &H,
    content: &str,
    mode: RecognitionMode,
    options: &ExportOptions,
) -> Result<ExportedArtifact, ExportError> {
    let document = ExportDocument::new(content, mode);
    let bytes = pdf::write_pdf(&document, &PdfStyle::for_mode(mode, options.font_size))?;
    let size = bytes.len();
    let file_name = export_file_name(mode, Utc::now().timestamp_millis());

    let object_url = ObjectUrl::register(host, Blob::pdf(bytes));
    let path = host.download(object_url.url(), &file_name).await?;

    tracing::info!(%mode, size, path = %path.display(), "Exported document");

    Ok(ExportedArtifact {
        file_name,
        path,
        size,
    })
}
