//! The default visual delegate, backed by `pulldown-latex`.

use super::traits::{MathDelegate, OutputFormat, RenderError};
use pulldown_latex::config::DisplayMode;
use pulldown_latex::{push_mathml, Parser, RenderConfig, Storage};

/// Renders LaTeX math to MathML Core with `pulldown-latex`.
///
/// The HTML format is the MathML wrapped in a `span` carrying the
/// `math-inline`/`math-display` class, which browsers render natively.
#[derive(Debug, Default, Clone, Copy)]
pub struct PulldownLatex;

impl MathDelegate for PulldownLatex {
    fn render(
        &self,
        source: &str,
        display_mode: bool,
        format: OutputFormat,
    ) -> Result<String, RenderError> {
        let storage = Storage::new();
        let events: Vec<_> = Parser::new(source, &storage).collect();

        // pulldown-latex would render errors inline as `<merror>`, treat them
        // as a failed call instead so the adapter can fall back.
        if let Some(err) = events.iter().find_map(|event| event.as_ref().err()) {
            return Err(RenderError::Parse(err.to_string()));
        }

        let mut config = RenderConfig::default();
        config.display_mode = if display_mode {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        };

        let mut mathml = String::new();
        push_mathml(&mut mathml, events.into_iter(), config)?;

        Ok(match format {
            OutputFormat::MathMl => mathml,
            OutputFormat::Html => {
                let class = if display_mode {
                    "math-display"
                } else {
                    "math-inline"
                };
                format!(r#"<span class="math {class}">{mathml}</span>"#)
            }
        })
    }

    fn name(&self) -> &'static str {
        "pulldown-latex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mathml_output() {
        let mathml = PulldownLatex
            .render(r"\frac{a}{b}", true, OutputFormat::MathMl)
            .unwrap();
        assert!(mathml.starts_with("<math"));
        assert!(mathml.contains("<mfrac"));
        assert!(mathml.ends_with("</math>"));
    }

    #[test]
    fn test_html_output_is_wrapped() {
        let html = PulldownLatex
            .render("x^2", false, OutputFormat::Html)
            .unwrap();
        assert!(html.starts_with(r#"<span class="math math-inline"><math"#));
        assert!(html.ends_with("</math></span>"));
    }

    #[test]
    fn test_parse_error() {
        let result = PulldownLatex.render(r"\frac{a}", true, OutputFormat::MathMl);
        assert!(matches!(result, Err(RenderError::Parse(_))));
    }
}
