//! Conversion of a LaTeX-like math source into the supported target notations.
//!
//! Every conversion is total: unsupported constructs are dropped by the rule
//! tables and an unavailable visual delegate yields the empty string for
//! MathML, never an error.

use crate::render::{OutputFormat, VisualRenderer};
use crate::rules::{ASCIIMATH, TYPST};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Notation a math source can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotationTarget {
    /// AsciiMath, no wrapping.
    AsciiMath,
    /// Typst equation wrapped in `$...$`.
    Typst,
    /// Bare `<math>…</math>` fragment, or `""` when unavailable.
    MathMl,
    /// Display-mode HTML from the visual renderer.
    VisualHtml,
    /// The source itself wrapped in `$$...$$`.
    RawLatexWrapped,
}

/// Error returned when parsing an unknown target name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notation target: {0:?}")]
pub struct ParseTargetError(pub String);

impl NotationTarget {
    /// All supported targets.
    pub const ALL: &'static [NotationTarget] = &[
        Self::AsciiMath,
        Self::Typst,
        Self::MathMl,
        Self::VisualHtml,
        Self::RawLatexWrapped,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AsciiMath => "ascii-math",
            Self::Typst => "typst",
            Self::MathMl => "mathml",
            Self::VisualHtml => "html",
            Self::RawLatexWrapped => "latex",
        }
    }
}

impl fmt::Display for NotationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NotationTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii-math" | "asciimath" => Ok(Self::AsciiMath),
            "typst" => Ok(Self::Typst),
            "mathml" => Ok(Self::MathMl),
            "html" | "visual-html" => Ok(Self::VisualHtml),
            "latex" | "raw-latex-wrapped" => Ok(Self::RawLatexWrapped),
            _ => Err(ParseTargetError(s.to_string())),
        }
    }
}

/// Convert `source` to AsciiMath.
///
/// # Example
///
/// ```
/// use mathpipe_core::transpile::to_asciimath;
///
/// assert_eq!(to_asciimath(r"\frac{a}{b}"), "(a)/(b)");
/// assert_eq!(to_asciimath(r"x^{2}_{i}"), "x^(2)_(i)");
/// ```
pub fn to_asciimath(source: &str) -> String {
    ASCIIMATH.apply(source)
}

/// Convert `source` to a Typst equation, always wrapped in `$...$`.
///
/// # Example
///
/// ```
/// use mathpipe_core::transpile::to_typst;
///
/// assert_eq!(to_typst(r"\frac{a}{b}"), "$(a) / (b)$");
/// ```
pub fn to_typst(source: &str) -> String {
    format!("${}$", TYPST.apply(source))
}

/// Wrap the raw source in display math delimiters.
pub fn wrap_latex(source: &str) -> String {
    format!("$${}$$", source.trim())
}

static MATH_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<math\b[^>]*>.*?</math>").unwrap());

/// Extract the first `<math …>…</math>` element from rendered markup.
pub fn extract_mathml(markup: &str) -> Option<&str> {
    MATH_ELEMENT.find(markup).map(|m| m.as_str())
}

/// Converts math sources into every [`NotationTarget`].
#[derive(Debug, Clone)]
pub struct Transpiler {
    renderer: VisualRenderer,
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new(VisualRenderer::pulldown_latex())
    }
}

impl Transpiler {
    pub fn new(renderer: VisualRenderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &VisualRenderer {
        &self.renderer
    }

    /// Convert `source` into `target`.
    pub fn transpile(&self, source: &str, target: NotationTarget) -> String {
        match target {
            NotationTarget::AsciiMath => to_asciimath(source),
            NotationTarget::Typst => to_typst(source),
            NotationTarget::MathMl => self.mathml(source),
            NotationTarget::VisualHtml => self.renderer.render(source, true, OutputFormat::Html),
            NotationTarget::RawLatexWrapped => wrap_latex(source),
        }
    }

    /// MathML fragment of `source`, `""` when the delegate cannot provide one.
    pub fn mathml(&self, source: &str) -> String {
        let markup = self.renderer.render(source, true, OutputFormat::MathMl);
        match extract_mathml(&markup) {
            Some(math) => math.to_string(),
            None => {
                tracing::debug!(source, "No <math> element in rendered markup");
                String::new()
            }
        }
    }
}
