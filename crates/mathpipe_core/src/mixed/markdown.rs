//! Markdown-light: the handful of prose rules applied around rendered math.

use once_cell::sync::Lazy;
use regex::Regex;

static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Apply headings, bold and line breaks to already escaped text.
///
/// Heading prefixes are matched from the most specific one down, so `### `
/// never turns into an `<h1>`. Line breaks are converted last.
pub fn markdown_light(text: &str) -> String {
    let text = H3.replace_all(text, "<h3>$1</h3>");
    let text = H2.replace_all(&text, "<h2>$1</h2>");
    let text = H1.replace_all(&text, "<h1>$1</h1>");
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    text.replace('\n', "<br>")
}
