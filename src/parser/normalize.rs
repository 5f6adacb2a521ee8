//! Lexical clean-up applied to raw ingredient lines before they are tokenized.

use regex::Regex;
use std::sync::LazyLock;

/// Price annotations some shopping-list scrapers append, e.g. `($1.98)`.
static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\$\d+\.\d{2}\)").expect("valid currency pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// How aggressively punctuation is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Only currency annotations are removed.
    Lenient,
    /// Additionally drop everything except alphanumerics, whitespace, `.` and `/`.
    Strict,
}

/// Normalize a raw ingredient line. Never fails; unmatched input comes back trimmed.
pub fn normalize(raw: &str, strictness: Strictness) -> String {
    let text = strip_currency(raw);
    match strictness {
        Strictness::Lenient => text,
        Strictness::Strict => collapse_whitespace(&strip_punctuation(&text)),
    }
}

/// Remove `($d.dd)` annotations and the whitespace they leave behind.
pub fn strip_currency(raw: &str) -> String {
    collapse_whitespace(&CURRENCY.replace_all(raw, " "))
}

/// Keep alphanumerics, whitespace, periods and slashes.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '.' || *c == '/')
        .collect()
}

/// Replace unicode vulgar fractions with their ASCII spelling, `1½` becoming `1 1/2`.
pub fn expand_vulgar_fractions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match vulgar_fraction(c) {
            Some(ascii) => {
                if out.chars().last().is_some_and(|prev| prev.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push_str(ascii);
            }
            None => out.push(c),
        }
    }
    out
}

fn vulgar_fraction(c: char) -> Option<&'static str> {
    let ascii = match c {
        '½' => "1/2",
        '⅓' => "1/3",
        '⅔' => "2/3",
        '¼' => "1/4",
        '¾' => "3/4",
        '⅕' => "1/5",
        '⅛' => "1/8",
        '⅜' => "3/8",
        '⅝' => "5/8",
        '⅞' => "7/8",
        _ => return None,
    };
    Some(ascii)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
