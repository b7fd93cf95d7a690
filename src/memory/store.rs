//! Bounded append-only log of conversation entries.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::memory::keywords::extract_keywords;
use crate::memory::ranker;

/// Opaque caller-supplied key-value bag attached to an entry.
///
/// Only the `id` and `type` keys are interpreted (as entry defaults); the
/// rest is stored verbatim and never consulted by ranking.
pub type Metadata = serde_json::Map<String, Value>;

/// Default bound on the number of retained entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Entry type assigned when the metadata carries none.
pub const DEFAULT_ENTRY_TYPE: &str = "general";

/// One stored unit of conversation context.
///
/// Immutable once stored; keywords are derived from `text` at insertion
/// time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Caller-supplied via `metadata.id`, else `entry_<ordinal>`.
    /// Not required to be unique; collisions are preserved as-is.
    pub id: String,
    /// The raw stored text.
    pub text: String,
    /// Priority tag (`requirements`, `architecture`, ..., or caller-defined).
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Normalized tokens derived from `text`.
    pub keywords: HashSet<String>,
    /// Insertion time, epoch milliseconds, non-decreasing per store.
    pub timestamp: u64,
    /// The full metadata bag, passed through unchanged.
    pub metadata: Metadata,
}

/// Tunables for a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Bound on store size; oldest entries are evicted past this.
    pub max_entries: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Ordered, size-bounded sequence of entries for one project/session scope.
///
/// Insertion order is significant: the zero-based position of an entry acts
/// as its recency proxy during ranking. The store only grows (append) or
/// truncates from the front (evict); entries are never mutated in place.
///
/// No internal locking: a store expects a single logical conversation
/// context at a time. Hosts serving concurrent requests against one store
/// must serialize `add`/`query` themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    project_id: String,
    entries: Vec<Entry>,
    config: MemoryConfig,
    #[serde(skip)]
    last_timestamp: u64,
}

impl MemoryStore {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_config(project_id, MemoryConfig::default())
    }

    pub fn with_config(project_id: impl Into<String>, config: MemoryConfig) -> Self {
        Self {
            project_id: project_id.into(),
            entries: Vec::new(),
            config,
            last_timestamp: 0,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Appends `text` with no metadata.
    pub fn add(&mut self, text: &str) {
        self.add_with_metadata(text, Metadata::new());
    }

    /// Appends `text`, deriving keywords and entry defaults from `metadata`.
    ///
    /// `metadata.id` and `metadata.type` seed the entry id and type when
    /// present (malformed values count as absent); the whole bag is retained
    /// verbatim. If the append exceeds `max_entries`, the oldest entries are
    /// evicted so that exactly the most recent `max_entries` remain. Always
    /// succeeds.
    pub fn add_with_metadata(&mut self, text: &str, metadata: Metadata) {
        let id = metadata
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("entry_{}", self.entries.len()));
        let entry_type = metadata
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ENTRY_TYPE)
            .to_owned();

        let entry = Entry {
            id,
            text: text.to_owned(),
            entry_type,
            keywords: extract_keywords(text),
            timestamp: self.next_timestamp(),
            metadata,
        };
        self.entries.push(entry);

        if self.entries.len() > self.config.max_entries {
            let excess = self.entries.len() - self.config.max_entries;
            self.entries.drain(..excess);
            tracing::debug!(
                project_id = %self.project_id,
                evicted = excess,
                "memory bound reached, dropped oldest entries"
            );
        }
    }

    /// Returns the texts most relevant to `prompt`, best first, at most `n`,
    /// only entries with a strictly positive relevance score.
    pub fn query(&self, prompt: &str, n: usize) -> Vec<String> {
        if self.entries.is_empty() {
            return Vec::new();
        }

        let query_keywords = extract_keywords(prompt);
        let query_lower = prompt.to_lowercase();
        let total = self.entries.len();

        let mut scored: Vec<(f64, &Entry)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let score = ranker::relevance_score(entry, index, total, &query_keywords, &query_lower);
                (score, entry)
            })
            .collect();

        // Stable sort: exact ties keep the earlier store index first.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        tracing::debug!(
            project_id = %self.project_id,
            candidates = total,
            requested = n,
            "ranked memory entries for query"
        );

        scored
            .into_iter()
            .take(n)
            .filter(|(score, _)| *score > 0.0)
            .map(|(_, entry)| entry.text.clone())
            .collect()
    }

    /// All texts with the given type tag, in insertion order.
    pub fn get_by_type(&self, entry_type: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.entry_type == entry_type)
            .map(|entry| entry.text.clone())
            .collect()
    }

    /// The last `n` texts, most recent first.
    pub fn get_recent(&self, n: usize) -> Vec<String> {
        self.entries
            .iter()
            .rev()
            .take(n)
            .map(|entry| entry.text.clone())
            .collect()
    }

    /// Drops every entry. Auto-generated ordinal ids restart from zero.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serializes the full entry log for export by a hosting shell.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    // Clamped so timestamps never decrease even if the wall clock steps back.
    fn next_timestamp(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.last_timestamp = now.max(self.last_timestamp);
        self.last_timestamp
    }
}
