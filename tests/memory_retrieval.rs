//! End-to-end retrieval behavior of the conversation memory store:
//! bounded eviction, ordering guarantees, and ranked query scenarios.

use context_memory::{extract_keywords, MemoryConfig, MemoryStore, Metadata};
use serde_json::json;

// ===== Helpers =====

fn tagged(id: &str, entry_type: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("id".into(), json!(id));
    metadata.insert("type".into(), json!(entry_type));
    metadata
}

fn store_with_requirements() -> MemoryStore {
    let mut store = MemoryStore::new("habit-tracker");
    store.add_with_metadata("Users can log daily habits", tagged("r1", "requirements"));
    store.add_with_metadata(
        "The database stores habit records",
        tagged("r2", "architecture"),
    );
    store
}

// ===== Ranked query scenarios =====

#[test]
fn ranks_keyword_overlap_above_type_alone() {
    // Scenario A: r2 shares "habit" and "database" with the query, r1
    // shares nothing after normalization; both must still appear.
    let store = store_with_requirements();
    let results = store.query("habit logging database", 5);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], "The database stores habit records");
    assert_eq!(results[1], "Users can log daily habits");
}

#[test]
fn stop_word_query_degrades_to_priority_and_recency() {
    // Scenario C: an all-stop-word query contributes zero keyword overlap,
    // so the requirements-typed entry outranks the newer general one.
    assert!(extract_keywords("the a an").is_empty());

    let mut store = MemoryStore::new("p");
    store.add_with_metadata("casual remark about nothing", tagged("n1", "general"));
    store.add_with_metadata("must support offline sync", tagged("n2", "requirements"));
    store.add_with_metadata("another casual remark", tagged("n3", "general"));

    let results = store.query("the a an", 5);
    assert_eq!(results[0], "must support offline sync");
}

#[test]
fn phrase_match_lifts_low_overlap_entry() {
    // Scenario D: an exact 3-word phrase earns the flat bonus even when
    // keyword overlap is minimal.
    let mut store = MemoryStore::new("p");
    store.add_with_metadata(
        "This engine can generate insights about user behavior",
        tagged("p1", "general"),
    );
    store.add_with_metadata(
        "Weekly report with charts and graphs of progress",
        tagged("p2", "general"),
    );

    let results = store.query("generate insights about", 5);
    assert_eq!(
        results[0],
        "This engine can generate insights about user behavior"
    );
}

#[test]
fn empty_store_returns_empty() {
    let store = MemoryStore::new("p");
    assert!(store.query("anything at all", 5).is_empty());
}

#[test]
fn query_is_deterministic() {
    let store = store_with_requirements();
    let first = store.query("habit logging database", 5);
    let second = store.query("habit logging database", 5);
    assert_eq!(first, second);
}

#[test]
fn query_truncates_to_n() {
    let mut store = MemoryStore::new("p");
    for i in 0..10 {
        store.add(&format!("habit note number {i}"));
    }
    assert_eq!(store.query("habit note", 3).len(), 3);
}

#[test]
fn minimal_entry_still_returned() {
    // A general-typed entry at index 0 of a single-entry store with no
    // overlap and no phrase match bottoms out at its type priority, which
    // is still strictly positive.
    let mut store = MemoryStore::new("p");
    store.add("completely unrelated sentence");
    let results = store.query("zzz qqq xxx", 5);
    assert_eq!(results.len(), 1);
}

#[test]
fn later_duplicate_outranks_earlier() {
    // Identical texts differ only in store position; recency must break
    // the tie toward the later entry.
    let mut store = MemoryStore::new("p");
    store.add("deploy service to production");
    store.add("unrelated filler entry");
    store.add("deploy service to production");

    let results = store.query("deploy service to production", 5);
    assert_eq!(results[0], "deploy service to production");
    assert_eq!(results[1], "deploy service to production");
    assert_eq!(results[2], "unrelated filler entry");
}

// ===== Store bound and ordering =====

#[test]
fn bound_holds_across_105_inserts() {
    // Scenario B: only the 100 most recent entries survive.
    let mut store = MemoryStore::new("p");
    for i in 0..105 {
        store.add(&format!("note number {i}"));
        assert!(store.len() <= 100);
    }
    assert_eq!(store.len(), 100);

    let recent = store.get_recent(100);
    assert_eq!(recent[0], "note number 104");
    assert_eq!(recent[99], "note number 5");
}

#[test]
fn get_recent_is_reverse_chronological() {
    let mut store = MemoryStore::new("p");
    for word in ["first", "second", "third"] {
        store.add(word);
    }
    assert_eq!(store.get_recent(3), vec!["third", "second", "first"]);
}

#[test]
fn get_by_type_preserves_insertion_order() {
    let store = store_with_requirements();
    assert_eq!(
        store.get_by_type("requirements"),
        vec!["Users can log daily habits"]
    );
    assert_eq!(
        store.get_by_type("architecture"),
        vec!["The database stores habit records"]
    );
}

#[test]
fn clear_then_query_returns_empty() {
    let mut store = store_with_requirements();
    store.clear();
    assert!(store.query("habit logging database", 5).is_empty());
}

// ===== Custom bound =====

#[test]
fn query_respects_custom_bound_after_eviction() {
    let mut store = MemoryStore::with_config("p", MemoryConfig { max_entries: 2 });
    store.add("oldest habit entry");
    store.add("middle habit entry");
    store.add("newest habit entry");

    let results = store.query("habit entry", 5);
    assert_eq!(results.len(), 2);
    assert!(!results.contains(&"oldest habit entry".to_string()));
}
