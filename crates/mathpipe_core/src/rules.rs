//! Ordered rewrite rules for the plain-text math notations.
//!
//! A [`RuleTable`] is a fixed sequence of [`RewriteRule`]s. Rules are applied
//! strictly in table order, each one seeing only the output of the previous
//! one, so the position of a rule in the table is part of its meaning:
//!
//! 1. fractions and roots
//! 2. `\left`/`\right` delimiters (AsciiMath only)
//! 3. braced super/subscripts
//! 4. Greek letters and operator names
//! 5. symbolic operators (per target)
//! 6. the catch-all that deletes any remaining `\command`
//!
//! Fraction and root arguments may hold braced scripts such as `x^{2}`. Any
//! other nested group, a fraction inside a fraction for instance, is left to
//! the catch-all rule.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Braced argument: plain text or `^{..}`/`_{..}` groups, one level deep.
const ARG: &str = r"\{((?:[^{}]|[\^_]\{[^{}]*\})*)\}";
const SUPERSCRIPT: &str = r"\^\{([^{}]*)\}";
const SUBSCRIPT: &str = r"_\{([^{}]*)\}";
/// A command name is the maximal run of ASCII letters after the backslash.
const COMMAND: &str = r"\\([a-zA-Z]+)";
/// Runs of spaces left behind by deleted commands and padded operators.
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Greek letters and operator names that both notations spell as the bare word.
const NAMED_WORDS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega", "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi",
    "Omega", "sum", "lim", "sin", "cos", "tan", "cot", "sec", "csc", "arcsin", "arccos",
    "arctan", "sinh", "cosh", "tanh", "log", "ln", "exp", "min", "max", "det", "gcd",
];

const ASCIIMATH_OPERATORS: &[(&str, &str)] = &[
    ("cdot", "*"),
    ("times", "xx"),
    ("div", "-:"),
    ("pm", "+-"),
    ("leq", "<="),
    ("le", "<="),
    ("geq", ">="),
    ("ge", ">="),
    ("neq", "!="),
    ("ne", "!="),
    ("approx", "~~"),
    ("to", "->"),
    ("rightarrow", "->"),
];

const ASCIIMATH_SYMBOLS: &[(&str, &str)] = &[
    ("infty", "oo"),
    ("int", "int"),
    ("prod", "prod"),
    ("partial", "del"),
    ("ldots", "..."),
    ("cdots", "cdots"),
    ("varepsilon", "varepsilon"),
    ("vartheta", "vartheta"),
    ("varphi", "varphi"),
];

const TYPST_OPERATORS: &[(&str, &str)] = &[
    ("cdot", "dot"),
    ("times", "times"),
    ("div", "div"),
    ("pm", "plus.minus"),
    ("leq", "<="),
    ("le", "<="),
    ("geq", ">="),
    ("ge", ">="),
    ("neq", "!="),
    ("ne", "!="),
    ("approx", "approx"),
    ("to", "->"),
    ("rightarrow", "->"),
];

const TYPST_SYMBOLS: &[(&str, &str)] = &[
    ("infty", "infinity"),
    ("int", "integral"),
    ("prod", "product"),
    ("partial", "diff"),
    ("ldots", "dots"),
    ("cdots", "dots.c"),
    ("varepsilon", "epsilon.alt"),
    ("vartheta", "theta.alt"),
    ("varphi", "phi.alt"),
];

fn frac() -> String {
    format!(r"\\[dt]?frac\s*{ARG}\s*{ARG}")
}

fn root() -> String {
    format!(r"\\sqrt\s*\[([^\[\]]*)\]\s*{ARG}")
}

fn sqrt() -> String {
    format!(r"\\sqrt\s*{ARG}")
}

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(command, _)| *command == name)
        .map(|(_, word)| *word)
}

fn named_word(name: &str) -> Option<&'static str> {
    NAMED_WORDS.iter().find(|word| **word == name).copied()
}

fn asciimath_symbol(name: &str) -> Option<&'static str> {
    lookup(ASCIIMATH_SYMBOLS, name)
}

fn typst_symbol(name: &str) -> Option<&'static str> {
    lookup(TYPST_SYMBOLS, name)
}

#[derive(Debug)]
enum Replacement {
    /// `regex` replacement template, `$1` refers to the first group.
    Template(&'static str),
    /// Replaces a `\command` whose name is known to the lookup, leaves others untouched.
    Command(fn(&str) -> Option<&'static str>),
    /// Replaces an operator command and its surrounding whitespace with the
    /// table word padded by a single space on each side.
    Operator(&'static [(&'static str, &'static str)]),
}

/// A single `pattern -> replacement` rewrite.
#[derive(Debug)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: Replacement,
}

impl RewriteRule {
    fn new(pattern: &str, replacement: Replacement) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn template(pattern: &str, template: &'static str) -> Self {
        Self::new(pattern, Replacement::Template(template))
    }

    fn command(lookup: fn(&str) -> Option<&'static str>) -> Self {
        Self::new(COMMAND, Replacement::Command(lookup))
    }

    /// Only the names in `table` are matched, longest first so that `\leq`
    /// is not read as `\le`.
    fn operator(table: &'static [(&'static str, &'static str)]) -> Self {
        let mut names = table.iter().map(|(name, _)| *name).collect::<Vec<_>>();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));
        Self::new(
            &format!(r"\s*\\({})(\s*)", names.join("|")),
            Replacement::Operator(table),
        )
    }

    /// Returns the source of the match pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Rewrites every non-overlapping match in `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(text, *template),
            Replacement::Command(lookup) => {
                self.pattern
                    .replace_all(text, |caps: &Captures| match lookup(&caps[1]) {
                        Some(word) => word.to_string(),
                        None => caps[0].to_string(),
                    })
            }
            Replacement::Operator(table) => self.pattern.replace_all(text, |caps: &Captures| {
                // `\nearrow` starts with `\ne` but is another command.
                let name_ends = !caps[2].is_empty()
                    || caps
                        .get(0)
                        .and_then(|m| text[m.end()..].chars().next())
                        .map_or(true, |next| !next.is_ascii_alphabetic());
                match lookup(*table, &caps[1]) {
                    Some(word) if name_ends => format!(" {word} "),
                    _ => caps[0].to_string(),
                }
            }),
        }
    }
}

/// An ordered list of rewrite rules for one target notation.
#[derive(Debug)]
pub struct RuleTable {
    name: &'static str,
    rules: Vec<RewriteRule>,
}

impl RuleTable {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Applies every rule in order, collapses runs of spaces and trims the result.
    ///
    /// Total: any input produces some output.
    pub fn apply(&self, source: &str) -> String {
        let mut text = source.to_string();
        let mut fired = 0usize;
        for rule in &self.rules {
            if let Cow::Owned(rewritten) = rule.apply(&text) {
                if rewritten != text {
                    fired += 1;
                }
                text = rewritten;
            }
        }
        tracing::trace!(table = self.name, fired, "Applied rewrite rules");
        SPACE_RUN.replace_all(&text, " ").trim().to_string()
    }
}

/// Rule table producing AsciiMath.
pub static ASCIIMATH: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    name: "asciimath",
    rules: vec![
        RewriteRule::template(&frac(), "($1)/($2)"),
        RewriteRule::template(&root(), "root($1)($2)"),
        RewriteRule::template(&sqrt(), "sqrt($1)"),
        RewriteRule::template(r"\\(?:left|right)\s*\\([{}])", "$1"),
        RewriteRule::template(r"\\(?:left|right)\s*([()\[\]|])", "$1"),
        RewriteRule::template(r"\\(?:left|right)\s*\.", ""),
        RewriteRule::template(SUPERSCRIPT, "^($1)"),
        RewriteRule::template(SUBSCRIPT, "_($1)"),
        RewriteRule::command(named_word),
        RewriteRule::operator(ASCIIMATH_OPERATORS),
        RewriteRule::command(asciimath_symbol),
        RewriteRule::template(COMMAND, ""),
    ],
});

/// Rule table producing the body of a Typst equation, without the `$` wrapping.
pub static TYPST: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    name: "typst",
    rules: vec![
        RewriteRule::template(&frac(), "($1) / ($2)"),
        RewriteRule::template(&root(), "root($1, $2)"),
        RewriteRule::template(&sqrt(), "sqrt($1)"),
        RewriteRule::template(SUPERSCRIPT, "^($1)"),
        RewriteRule::template(SUBSCRIPT, "_($1)"),
        RewriteRule::command(named_word),
        RewriteRule::operator(TYPST_OPERATORS),
        RewriteRule::command(typst_symbol),
        RewriteRule::template(COMMAND, ""),
    ],
});
