//! Core library of mathpipe.
//!
//! This crate turns the LaTeX-like output of a math/OCR recognizer into the
//! notations a user can paste or read, renders documents mixing prose with
//! math spans, and exports results as PDF files.
//!
//! # Modules
//!
//! - [`rules`] - Ordered rewrite rule tables for AsciiMath and Typst
//! - [`transpile`] - Conversion of a math source into every notation target
//! - [`render`] - Visual math rendering behind an injected delegate
//! - [`mixed`] - Mixed markdown-math rendering
//! - [`export`] - PDF export through a download host
//! - [`mode`] - Recognition modes

pub mod export;
pub mod mixed;
pub mod mode;
pub mod render;
pub mod rules;
pub mod transpile;

// Re-export commonly used types at crate root
pub use export::{
    export_document, DirectoryHost, DownloadHost, ExportError, ExportOptions, ExportedArtifact,
};
pub use mixed::{render_mixed, segment, MixedRenderer, Segment};
pub use mode::{ParseModeError, RecognitionMode};
pub use render::{MathDelegate, OutputFormat, PulldownLatex, RenderError, VisualRenderer};
pub use transpile::{NotationTarget, ParseTargetError, Transpiler};
