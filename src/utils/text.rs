//! Text normalization shared by the parser and the reconciliation engine.

use regex::Regex;
use std::sync::LazyLock;

static BOLD_CLOSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\^\*\*([^)^]+?)\^\^\*\*").expect("valid regex"));
static BOLD_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\^\*\*([^)^]+?)\^\^").expect("valid regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\^\*([^)^]+?)\*\^\^").expect("valid regex"));
static PLAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\^([^)^]+?)\^\^").expect("valid regex"));

/// Normalize a weapon or unit name for comparison.
///
/// Lowercases, folds dash variants (hyphen, non-breaking hyphen, figure dash,
/// en dash, em dash) to `-`, and folds curly quotes to straight quotes.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}

/// True if either normalized name contains the other. Empty names never match.
#[must_use]
pub fn names_overlap(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(b) || b.contains(a)
}

/// Convert catalogue emphasis markup (`^^**x^^**`, `^^*x*^^`, `^^x^^`) to
/// Markdown emphasis, keeping the enclosed text.
#[must_use]
pub fn clean_markup(text: &str) -> String {
    if !text.contains("^^") {
        return text.to_string();
    }
    let text = BOLD_CLOSED_RE.replace_all(text, "**$1**");
    let text = BOLD_OPEN_RE.replace_all(&text, "**$1**");
    let text = ITALIC_RE.replace_all(&text, "*$1*");
    PLAIN_RE.replace_all(&text, "$1").into_owned()
}
