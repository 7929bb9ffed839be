//! Small text helpers shared by the extractors

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a captured snippet returned for display
pub const SNIPPET_LEN: usize = 100;

/// Collapse all whitespace runs (including newlines) into single spaces
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters, respecting char boundaries
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].trim_end().to_string(),
        None => input.to_string(),
    }
}

/// Truncate a regex capture for display
pub fn snippet(input: &str) -> String {
    truncate_chars(&collapse_whitespace(input), SNIPPET_LEN)
}

pub fn word_count(input: &str) -> usize {
    input.split_whitespace().count()
}

/// Remove HTML tags from schema text fields that embed markup
pub fn strip_tags(input: &str) -> String {
    static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("invalid tag regex"));
    collapse_whitespace(&RE_TAG.replace_all(input, " "))
}

/// Words of three or more letters, lowercased, without filler words
pub fn significant_words(input: &str) -> Vec<String> {
    const STOP_WORDS: &[&str] = &[
        "the", "and", "for", "with", "from", "this", "that", "your", "our", "you", "are", "was",
        "new",
    ];

    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}
