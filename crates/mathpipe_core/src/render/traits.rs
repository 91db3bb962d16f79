//! The visual delegate seam.
//!
//! This module defines the [`MathDelegate`] trait that the visual renderer
//! adapter wraps. Any math typesetting engine can be plugged in behind it,
//! including test doubles that fail on purpose.

use std::fmt;

/// Error type for a single delegate call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No delegate is installed.
    #[error("visual delegate unavailable")]
    Unavailable,

    /// The delegate rejected the math source.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error while writing the rendered markup.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The delegate panicked.
    #[error("delegate panicked: {0}")]
    Panicked(String),

    /// General rendering error.
    #[error("Render error: {0}")]
    Other(String),
}

/// Markup flavour requested from the delegate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markup meant to be injected into an HTML surface.
    #[default]
    Html,
    /// A MathML fragment.
    MathMl,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => f.write_str("html"),
            Self::MathMl => f.write_str("mathml"),
        }
    }
}

/// An external math typesetting engine.
pub trait MathDelegate: Send + Sync {
    /// Render `source` into markup of the given `format`.
    ///
    /// `display_mode` selects block (display) style over inline style.
    fn render(
        &self,
        source: &str,
        display_mode: bool,
        format: OutputFormat,
    ) -> Result<String, RenderError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "delegate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        let io_err = RenderError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "broken pipe",
        ));
        assert!(io_err.to_string().contains("IO error"));

        let parse_err = RenderError::Parse("unexpected `}`".to_string());
        assert_eq!(parse_err.to_string(), "Parse error: unexpected `}`");

        assert_eq!(
            RenderError::Unavailable.to_string(),
            "visual delegate unavailable"
        );
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Html.to_string(), "html");
        assert_eq!(OutputFormat::MathMl.to_string(), "mathml");
    }
}
