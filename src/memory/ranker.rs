//! Relevance scoring for ranked context retrieval.
//!
//! The score for one entry against one query is the sum of four independent
//! components: keyword overlap, type priority, recency, and an exact-phrase
//! bonus. All weights live here as named constants so they can be inspected
//! and tuned in one place.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::memory::store::Entry;

/// Weights of the four scoring components.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    /// Points per keyword shared between query and entry.
    pub overlap_point: f64,
    /// Cap on the keyword-overlap component.
    pub overlap_cap: f64,
    /// Spread of the recency component across the store.
    pub recency_span: f64,
    /// Flat bonus when a 3-word query phrase occurs in the entry text.
    pub phrase_bonus: f64,
}

pub const WEIGHTS: ScoreWeights = ScoreWeights {
    overlap_point: 2.0,
    overlap_cap: 10.0,
    recency_span: 2.0,
    phrase_bonus: 5.0,
};

/// Priority assigned to unknown type tags.
const GENERAL_PRIORITY: f64 = 1.0;

static TYPE_PRIORITY: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("requirements", 5.0),
        ("architecture", 5.0),
        ("explanation", 4.0),
        ("recommendations", 3.0),
        ("qa", 2.0),
        ("general", GENERAL_PRIORITY),
    ])
});

/// Word runs used to build 3-word phrase windows from the query.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9_]+").expect("valid word regex"));

/// Priority weight for a type tag; unrecognized tags rank like `general`.
pub fn type_priority(entry_type: &str) -> f64 {
    TYPE_PRIORITY
        .get(entry_type)
        .copied()
        .unwrap_or(GENERAL_PRIORITY)
}

/// Scores `entry` against a query.
///
/// `index` is the entry's zero-based position in the store and `total` the
/// current store length; later entries earn a proportionally larger recency
/// component. `query_lower` must be the lowercased query text.
pub fn relevance_score(
    entry: &Entry,
    index: usize,
    total: usize,
    query_keywords: &HashSet<String>,
    query_lower: &str,
) -> f64 {
    let mut score = 0.0;

    // 1. Keyword overlap, capped; zero when either set is empty.
    if !query_keywords.is_empty() && !entry.keywords.is_empty() {
        let overlap = query_keywords.intersection(&entry.keywords).count();
        score += (overlap as f64 * WEIGHTS.overlap_point).min(WEIGHTS.overlap_cap);
    }

    // 2. Type priority.
    score += type_priority(&entry.entry_type);

    // 3. Recency: position within the store as a fraction of its length.
    score += index as f64 / total as f64 * WEIGHTS.recency_span;

    // 4. Exact phrase match, first matching window only.
    let entry_lower = entry.text.to_lowercase();
    if has_phrase_match(query_lower, &entry_lower) {
        score += WEIGHTS.phrase_bonus;
    }

    score
}

/// True when any overlapping 3-word window of the query occurs as a literal
/// substring of the entry text. Windows are `\w+` runs joined by single
/// spaces; the scan is query-phrases-in-entry, not the reverse.
fn has_phrase_match(query_lower: &str, entry_lower: &str) -> bool {
    let words: Vec<&str> = WORD_RE.find_iter(query_lower).map(|m| m.as_str()).collect();
    words
        .windows(3)
        .any(|w| entry_lower.contains(&w.join(" ")))
}
