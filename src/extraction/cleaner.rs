//! Normalization and sanity checks for raw extracted text.

use regex::Regex;
use std::sync::LazyLock;

static EXCESS_LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static pattern compiles"));

const MIN_VALID_CHARS: usize = 50;
const MIN_MEANINGFUL_CHARS: usize = 20;

/// Normalize raw extracted text.
///
/// Line breaks are unified to `\n`, every line is trimmed, lines with at most one character
/// are dropped, internal whitespace runs collapse to a single space, and runs of three or
/// more line breaks shrink to two. Empty input yields an empty string.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<String> = normalized
        .split('\n')
        .map(str::trim)
        .filter(|line| line.chars().count() > 1)
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    let joined = lines.join("\n");
    EXCESS_LINE_BREAKS
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

/// Count the alphanumeric characters in `text`.
pub fn meaningful_char_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}

/// Decide whether extracted text is usable rather than garbled.
///
/// Text fails when it is blank, shorter than 50 characters once trimmed, or carries 20 or
/// fewer alphanumeric characters.
pub fn is_valid_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() < MIN_VALID_CHARS {
        return false;
    }
    meaningful_char_count(text) > MIN_MEANINGFUL_CHARS
}
