//! Conversation memory with keyword-relevance retrieval.
//!
//! This module stores conversation context as a bounded append-only log and
//! retrieves the entries most relevant to a follow-up query using keyword
//! overlap, type priority, recency, and phrase matching. No embeddings, no
//! external services.

pub mod keywords;
pub mod ranker;
pub mod store;

pub use keywords::extract_keywords;
pub use store::{Entry, MemoryConfig, MemoryStore, Metadata};
