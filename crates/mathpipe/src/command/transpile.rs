use super::{read_input, visual_renderer};
use anyhow::Result;
use clap::Parser;
use mathpipe_config::Config;
use mathpipe_core::{NotationTarget, Transpiler};

/// Convert a math expression into another notation.
#[derive(Parser, Debug, Clone)]
pub struct Transpile {
    /// Target notation: ascii-math, typst, mathml, html or latex.
    ///
    /// Every notation is printed when omitted.
    #[clap(long)]
    pub target: Option<NotationTarget>,

    /// LaTeX-like expression, read from stdin when omitted.
    pub expr: Option<String>,
}

impl Transpile {
    pub async fn run(self, config: &Config) -> Result<()> {
        let source = match self.expr {
            Some(expr) => expr,
            None => read_input(None).await?,
        };
        let transpiler = Transpiler::new(visual_renderer(&config.render));

        for line in render_targets(&transpiler, source.trim(), self.target) {
            println!("{line}");
        }

        Ok(())
    }
}

/// A single target prints the bare output, all targets are labelled.
fn render_targets(
    transpiler: &Transpiler,
    source: &str,
    target: Option<NotationTarget>,
) -> Vec<String> {
    match target {
        Some(target) => vec![transpiler.transpile(source, target)],
        None => NotationTarget::ALL
            .iter()
            .map(|target| format!("{target}: {}", transpiler.transpile(source, *target)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathpipe_core::VisualRenderer;

    #[test]
    fn test_single_target() {
        let transpiler = Transpiler::new(VisualRenderer::unavailable());
        assert_eq!(
            render_targets(&transpiler, r"\frac{a}{b}", Some(NotationTarget::AsciiMath)),
            vec!["(a)/(b)".to_string()]
        );
    }

    #[test]
    fn test_all_targets_are_labelled() {
        let transpiler = Transpiler::new(VisualRenderer::unavailable());
        let lines = render_targets(&transpiler, "x^2", None);
        assert_eq!(
            lines,
            vec![
                "ascii-math: x^2".to_string(),
                "typst: $x^2$".to_string(),
                "mathml: ".to_string(),
                r#"html: <pre class="math-fallback">x^2</pre>"#.to_string(),
                "latex: $$x^2$$".to_string(),
            ]
        );
    }
}
