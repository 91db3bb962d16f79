//! Recognition mode of a result.
//!
//! The [`RecognitionMode`] tells what kind of recognition produced a piece of
//! text. It is the single source of truth for the export title, the file
//! label and the body font style.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mode hint attached to a recognition result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionMode {
    /// A single formula, LaTeX-like source.
    Formula,
    /// Plain text recognition.
    Ocr,
    /// A full document mixing prose and math.
    Document,
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown recognition mode: {0:?}, expected one of formula, ocr, document")]
pub struct ParseModeError(pub String);

impl RecognitionMode {
    /// All recognition modes.
    pub const ALL: &'static [RecognitionMode] = &[Self::Formula, Self::Ocr, Self::Document];

    /// Get the name of this mode as a string.
    ///
    /// This is also the label used in exported file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Formula => "formula",
            Self::Ocr => "ocr",
            Self::Document => "document",
        }
    }

    /// Title line of an exported document.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathpipe_core::RecognitionMode;
    ///
    /// assert_eq!(RecognitionMode::Formula.title(), "Formula Recognition Result");
    /// assert_eq!(RecognitionMode::Ocr.title(), "Text Recognition Result");
    /// ```
    pub fn title(&self) -> &'static str {
        match self {
            Self::Formula => "Formula Recognition Result",
            Self::Ocr => "Text Recognition Result",
            Self::Document => "Document Recognition Result",
        }
    }

    /// Whether the content is a formula and should use a math-oriented face.
    pub fn is_math_oriented(&self) -> bool {
        matches!(self, Self::Formula)
    }
}

impl fmt::Display for RecognitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecognitionMode {
    type Err = ParseModeError;

    /// Parse a mode name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formula" | "math" => Ok(Self::Formula),
            "ocr" | "text" => Ok(Self::Ocr),
            "document" | "doc" => Ok(Self::Document),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("formula".parse(), Ok(RecognitionMode::Formula));
        assert_eq!("ocr".parse(), Ok(RecognitionMode::Ocr));
        assert_eq!("document".parse(), Ok(RecognitionMode::Document));
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("FORMULA".parse(), Ok(RecognitionMode::Formula));
        assert_eq!("Ocr".parse(), Ok(RecognitionMode::Ocr));
        assert_eq!(" Doc ".parse(), Ok(RecognitionMode::Document));
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "handwriting".parse::<RecognitionMode>().unwrap_err();
        assert_eq!(err, ParseModeError("handwriting".to_string()));
        assert!(err.to_string().contains("handwriting"));
        assert!("".parse::<RecognitionMode>().is_err());
    }

    #[test]
    fn test_name_round_trip() {
        for mode in RecognitionMode::ALL {
            assert_eq!(mode.name().parse(), Ok(*mode));
            assert_eq!(mode.to_string(), mode.name());
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&RecognitionMode::Formula).unwrap(),
            r#""formula""#
        );
        let mode: RecognitionMode = serde_json::from_str(r#""document""#).unwrap();
        assert_eq!(mode, RecognitionMode::Document);
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            RecognitionMode::Document.title(),
            "Document Recognition Result"
        );
        assert!(RecognitionMode::Formula.is_math_oriented());
        assert!(!RecognitionMode::Ocr.is_math_oriented());
        assert!(!RecognitionMode::Document.is_math_oriented());
    }
}
