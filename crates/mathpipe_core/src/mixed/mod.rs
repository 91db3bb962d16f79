//! Rendering of composite documents interleaving prose and math.
//!
//! A document is first split into [`Segment`]s. Math spans are rendered
//! through the [`VisualRenderer`] and parked behind opaque placeholders while
//! markdown-light runs over the escaped prose, then put back in place. Every
//! math span is rendered on its own, so one bad span only degrades itself.
//!
//! Known limitation: a `$` meant as prose inside a heading can still be taken
//! as an inline math delimiter.

mod markdown;
mod segment;

use crate::render::{escape_html, OutputFormat, VisualRenderer};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub use markdown::markdown_light;
pub use segment::{segment, Segment};

/// Default CSS class of the block math container.
pub const DEFAULT_BLOCK_CLASS: &str = "math-block";

const PLACEHOLDER_START: char = '\u{E000}';
const PLACEHOLDER_END: char = '\u{E001}';

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").unwrap());

/// Renders mixed markdown-math documents to HTML.
#[derive(Debug, Clone)]
pub struct MixedRenderer {
    renderer: VisualRenderer,
    block_class: String,
}

impl Default for MixedRenderer {
    fn default() -> Self {
        Self::new(VisualRenderer::pulldown_latex())
    }
}

impl MixedRenderer {
    pub fn new(renderer: VisualRenderer) -> Self {
        Self {
            renderer,
            block_class: DEFAULT_BLOCK_CLASS.to_string(),
        }
    }

    /// Use a different CSS class for the block math container.
    pub fn with_block_class(mut self, block_class: impl Into<String>) -> Self {
        self.block_class = block_class.into();
        self
    }

    pub fn block_class(&self) -> &str {
        &self.block_class
    }

    /// Render `doc` to HTML. Never fails.
    pub fn render(&self, doc: &str) -> String {
        let segments = segment(doc);

        let mut text = String::with_capacity(doc.len());
        let mut rendered_math = Vec::new();

        for segment in &segments {
            match segment {
                Segment::Prose(prose) => text.push_str(&escape_prose(prose)),
                Segment::BlockMath(math) => {
                    let html = self.renderer.render(math, true, OutputFormat::Html);
                    push_placeholder(
                        &mut text,
                        &mut rendered_math,
                        format!(
                            r#"<div class="{}">{html}</div>"#,
                            escape_html(&self.block_class)
                        ),
                    );
                }
                Segment::InlineMath(math) => {
                    let html = self.renderer.render(math, false, OutputFormat::Html);
                    push_placeholder(&mut text, &mut rendered_math, html);
                }
            }
        }

        let html = markdown_light(&text);

        PLACEHOLDER
            .replace_all(&html, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| rendered_math.get(idx))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

/// Render `doc` with the default visual delegate.
///
/// # Example
///
/// ```
/// use mathpipe_core::render_mixed;
///
/// let html = render_mixed("## Result\n**area** is $\\pi r^2$");
/// assert!(html.starts_with("<h2>Result</h2><br><strong>area</strong> is "));
/// assert!(html.contains("<math"));
/// ```
pub fn render_mixed(doc: &str) -> String {
    MixedRenderer::default().render(doc)
}

fn push_placeholder(text: &mut String, rendered_math: &mut Vec<String>, html: String) {
    text.push(PLACEHOLDER_START);
    text.push_str(&rendered_math.len().to_string());
    text.push(PLACEHOLDER_END);
    rendered_math.push(html);
}

/// Escape prose, removing any character that could forge a placeholder.
///
/// CRLF line endings are normalised to `\n` first.
fn escape_prose(prose: &str) -> String {
    let prose = prose
        .replace("\r\n", "\n")
        .replace([PLACEHOLDER_START, PLACEHOLDER_END], "\u{FFFD}");
    escape_html(&prose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{echo_renderer, EchoDelegate};
    use crate::render::fallback_markup;
    use std::sync::Arc;

    fn echo() -> MixedRenderer {
        MixedRenderer::new(echo_renderer())
    }

    #[test]
    fn test_block_and_inline_math() {
        assert_eq!(
            echo().render("intro $$a+b$$ outro"),
            r#"intro <div class="math-block"><m block>a+b</m></div> outro"#
        );
        assert_eq!(echo().render("let $x$ be"), "let <m inline>x</m> be");
    }

    #[test]
    fn test_markdown_light_around_math() {
        assert_eq!(
            echo().render("# Area $r$\n**note** $$\\pi r^2$$"),
            concat!(
                "<h1>Area <m inline>r</m></h1><br>",
                "<strong>note</strong> ",
                r#"<div class="math-block"><m block>\pi r^2</m></div>"#
            )
        );
    }

    #[test]
    fn test_math_is_not_touched_by_markdown_light() {
        // `**` and line breaks inside math belong to the math.
        assert_eq!(
            echo().render("$$a**b**\nc$$"),
            "<div class=\"math-block\"><m block>a**b**\nc</m></div>"
        );
    }

    #[test]
    fn test_prose_is_escaped() {
        assert_eq!(
            echo().render("a < b & $x$"),
            "a &lt; b &amp; <m inline>x</m>"
        );
        assert_eq!(echo().render("fake \u{E000}0\u{E001}"), "fake \u{FFFD}0\u{FFFD}");
    }

    #[test]
    fn test_failing_span_is_isolated() {
        let renderer = MixedRenderer::new(VisualRenderer::new(Arc::new(EchoDelegate {
            fail_on: Some("bad"),
            panic_on: Some("worse"),
        })));
        assert_eq!(
            renderer.render("$ok$ $bad$ $$worse$$ $fine$"),
            format!(
                r#"<m inline>ok</m> {} <div class="math-block">{}</div> <m inline>fine</m>"#,
                fallback_markup("bad", false),
                fallback_markup("worse", true)
            )
        );
    }

    #[test]
    fn test_unavailable_delegate() {
        let renderer = MixedRenderer::new(VisualRenderer::unavailable());
        assert_eq!(
            renderer.render("see $a<b$"),
            r#"see <code class="math-fallback">a&lt;b</code>"#
        );
    }

    #[test]
    fn test_custom_block_class() {
        let renderer = echo().with_block_class("display");
        assert_eq!(renderer.block_class(), "display");
        assert_eq!(
            renderer.render("$$x$$"),
            r#"<div class="display"><m block>x</m></div>"#
        );
    }

    #[test]
    fn test_block_class_is_escaped() {
        let renderer = echo().with_block_class(r#"a" onclick="x"#);
        assert_eq!(
            renderer.render("$$x$$"),
            r#"<div class="a&quot; onclick=&quot;x"><m block>x</m></div>"#
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(echo().render("# T\r\nx"), "<h1>T</h1><br>x");
        assert_eq!(
            echo().render("**a**\r\n$$x$$\r\n## $y$\r\n"),
            concat!(
                "<strong>a</strong><br>",
                r#"<div class="math-block"><m block>x</m></div><br>"#,
                "<h2><m inline>y</m></h2><br>"
            )
        );
    }

    #[test]
    fn test_dollar_in_heading_is_consumed() {
        assert_eq!(
            echo().render("# Costs $5 and $6"),
            "<h1>Costs <m inline>5 and </m>6</h1>"
        );
    }

    #[test]
    fn test_render_mixed_with_pulldown_latex() {
        let html = render_mixed(r"$$\frac{a}{b}$$");
        assert!(html.starts_with(r#"<div class="math-block"><span class="math math-display"><math"#));
        assert!(html.ends_with("</math></span></div>"));
    }
}
