//! Visual math rendering adapter.
//!
//! [`VisualRenderer`] wraps exactly one injected [`MathDelegate`] and never
//! fails: when the delegate is missing, returns an error or panics, the raw
//! source is returned escaped inside an inert wrapper instead.
//!
//! - inline fallback: `<code class="math-fallback">…</code>`
//! - display fallback: `<pre class="math-fallback">…</pre>`

mod latex;
mod traits;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub use latex::PulldownLatex;
pub use traits::{MathDelegate, OutputFormat, RenderError};

/// CSS class of the wrapper used when a span cannot be rendered.
pub const FALLBACK_CLASS: &str = "math-fallback";

/// Escapes the HTML special characters of `text`.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Markup shown in place of a span the delegate could not render.
pub fn fallback_markup(source: &str, display_mode: bool) -> String {
    let tag = if display_mode { "pre" } else { "code" };
    format!(
        r#"<{tag} class="{FALLBACK_CLASS}">{}</{tag}>"#,
        escape_html(source)
    )
}

/// Adapter around an optional visual delegate.
#[derive(Clone, Default)]
pub struct VisualRenderer {
    delegate: Option<Arc<dyn MathDelegate>>,
}

impl fmt::Debug for VisualRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualRenderer")
            .field("delegate", &self.delegate.as_ref().map(|d| d.name()))
            .finish()
    }
}

impl VisualRenderer {
    /// Create an adapter around the given delegate.
    pub fn new(delegate: Arc<dyn MathDelegate>) -> Self {
        Self {
            delegate: Some(delegate),
        }
    }

    /// Create an adapter without delegate, every call falls back.
    pub fn unavailable() -> Self {
        Self { delegate: None }
    }

    /// Create an adapter backed by [`PulldownLatex`].
    pub fn pulldown_latex() -> Self {
        Self::new(Arc::new(PulldownLatex))
    }

    pub fn is_available(&self) -> bool {
        self.delegate.is_some()
    }

    /// Call the delegate inside a fault boundary.
    ///
    /// Panics raised by the delegate are caught and reported as
    /// [`RenderError::Panicked`].
    pub fn try_render(
        &self,
        source: &str,
        display_mode: bool,
        format: OutputFormat,
    ) -> Result<String, RenderError> {
        let delegate = self.delegate.as_ref().ok_or(RenderError::Unavailable)?;

        panic::catch_unwind(AssertUnwindSafe(|| {
            delegate.render(source, display_mode, format)
        }))
        .unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(RenderError::Panicked(message))
        })
    }

    /// Render `source`, falling back to escaped source on any failure.
    pub fn render(&self, source: &str, display_mode: bool, format: OutputFormat) -> String {
        match self.try_render(source, display_mode, format) {
            Ok(markup) => markup,
            Err(err) => {
                tracing::warn!(
                    ?err,
                    source,
                    display_mode,
                    %format,
                    "Visual rendering failed, using fallback"
                );
                fallback_markup(source, display_mode)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::EchoDelegate;
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a<b & "c">'"#), "a&lt;b &amp; &quot;c&quot;&gt;&#39;");
        assert_eq!(escape_html(r"\frac{a}{b}"), r"\frac{a}{b}");
    }

    #[test]
    fn test_render_success() {
        let renderer = testing::echo_renderer();
        assert_eq!(renderer.render("x", false, OutputFormat::Html), "<m inline>x</m>");
        assert_eq!(renderer.render("x", true, OutputFormat::Html), "<m block>x</m>");
    }

    #[test]
    fn test_unavailable_falls_back() {
        let renderer = VisualRenderer::unavailable();
        assert!(!renderer.is_available());
        assert_eq!(
            renderer.render("a<b", false, OutputFormat::Html),
            r#"<code class="math-fallback">a&lt;b</code>"#
        );
        assert_eq!(
            renderer.render("a<b", true, OutputFormat::Html),
            r#"<pre class="math-fallback">a&lt;b</pre>"#
        );
        assert!(matches!(
            renderer.try_render("x", true, OutputFormat::MathMl),
            Err(RenderError::Unavailable)
        ));
    }

    #[test]
    fn test_delegate_error_falls_back() {
        let renderer = VisualRenderer::new(Arc::new(EchoDelegate {
            fail_on: Some("bad"),
            panic_on: None,
        }));
        assert_eq!(
            renderer.render("bad", false, OutputFormat::Html),
            fallback_markup("bad", false)
        );
    }

    #[test]
    fn test_delegate_panic_is_contained() {
        let renderer = VisualRenderer::new(Arc::new(EchoDelegate {
            fail_on: None,
            panic_on: Some("boom"),
        }));
        match renderer.try_render("boom", true, OutputFormat::Html) {
            Err(RenderError::Panicked(message)) => assert!(message.contains("boom")),
            other => panic!("Expected a contained panic, got {other:?}"),
        }
        assert_eq!(
            renderer.render("boom", true, OutputFormat::Html),
            fallback_markup("boom", true)
        );
    }

    #[test]
    fn test_debug_shows_delegate_name() {
        let renderer = testing::echo_renderer();
        assert_eq!(
            format!("{renderer:?}"),
            r#"VisualRenderer { delegate: Some("echo") }"#
        );
    }
}
