//! Keyword extraction for stored entries and incoming queries.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Common English function words excluded from keyword extraction:
/// articles, conjunctions, auxiliary/modal verbs, pronouns, demonstratives.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
        "of", "with", "by", "from", "as", "is", "was", "are", "were", "be",
        "been", "being", "have", "has", "had", "do", "does", "did", "will",
        "would", "should", "could", "may", "might", "must", "can", "this",
        "that", "these", "those", "i", "you", "he", "she", "it", "we", "they",
    ]
    .into_iter()
    .collect()
});

/// Tokens of this length or shorter are dropped.
const MIN_TOKEN_LEN: usize = 3;

/// Maximal runs of ASCII letters/digits; everything else separates tokens.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("valid token regex"));

/// Extracts the set of normalized keywords from `text`.
///
/// Lowercases, tokenizes on `[a-z0-9]+` runs, drops stop words and tokens
/// shorter than three characters. Pure and total: always returns a
/// (possibly empty) set.
pub fn extract_keywords(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| token.len() >= MIN_TOKEN_LEN && !STOP_WORDS.contains(token))
        .map(str::to_owned)
        .collect()
}
