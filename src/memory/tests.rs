//! Tests for the memory store, using a stub embedding provider.

use std::collections::HashMap;

use serde_json::json;
use tempfile::TempDir;

use crate::config::Config;
use crate::errors::Error;
use crate::provider::EmbeddingProvider;

use super::MemoryStore;

/// Provider returning canned vectors per input text.
///
/// Unknown inputs fall back to `default`; a `None` default models the
/// provider's "no embedding available" outcome.
struct StubProvider {
    vectors: HashMap<String, Vec<f32>>,
    default: Option<Vec<f32>>,
}

impl StubProvider {
    fn with_default(default: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            default: Some(default),
        }
    }

    fn unavailable() -> Self {
        Self {
            vectors: HashMap::new(),
            default: None,
        }
    }

    fn vector(mut self, text: &str, vec: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vec);
        self
    }
}

impl EmbeddingProvider for StubProvider {
    fn embed(&self, text: &str, _model: &str) -> Result<Option<Vec<f32>>, Error> {
        match self.vectors.get(text) {
            Some(vec) => Ok(Some(vec.clone())),
            None => Ok(self.default.clone()),
        }
    }
}

fn test_store(provider: StubProvider) -> MemoryStore {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.database_path = dir.path().join("test.db");
    std::mem::forget(dir);
    MemoryStore::with_provider(config, Box::new(provider)).unwrap()
}

fn axis(index: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; 8];
    v[index] = 1.0;
    v
}

#[test]
fn test_add_then_list_roundtrip() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let before = store.list_all().unwrap().len();
    let id = store.add("remember this", None, None).unwrap();
    assert!(id > 0);

    let records = store.list_all().unwrap();
    assert_eq!(records.len(), before + 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].content, "remember this");
    assert!(records[0].tags.is_empty());
    assert_eq!(records[0].metadata, json!({}));
}

#[test]
fn test_add_ids_strictly_increase() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let id1 = store.add("first", None, None).unwrap();
    let id2 = store.add("second", None, None).unwrap();
    assert!(id2 > id1);
}

#[test]
fn test_add_empty_content_rejected() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let result = store.add("   ", None, None);
    assert!(matches!(result, Err(Error::EmptyInput)));
    assert_eq!(store.statistics().unwrap().total_memories, 0);
}

#[test]
fn test_add_oversized_content_rejected() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let long_text = "x".repeat(10_001);
    let result = store.add(&long_text, None, None);
    assert!(matches!(
        result,
        Err(Error::InputTooLong {
            max_length: 10_000,
            actual_length: 10_001
        })
    ));
    assert_eq!(store.statistics().unwrap().total_memories, 0);
}

#[test]
fn test_add_at_exactly_max_length_succeeds() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let exact_text = "x".repeat(10_000);
    assert!(store.add(&exact_text, None, None).is_ok());
}

#[test]
fn test_add_tag_with_comma_rejected() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let tags = vec!["a,b".to_string()];
    let result = store.add("content", Some(&tags), None);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_add_empty_tag_rejected() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let tags = vec!["".to_string()];
    let result = store.add("content", Some(&tags), None);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_add_non_object_metadata_rejected() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let metadata = json!(["not", "an", "object"]);
    let result = store.add("content", None, Some(&metadata));
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_add_embedding_unavailable_persists_nothing() {
    let store = test_store(StubProvider::unavailable());

    let result = store.add("content", None, None);
    assert!(matches!(result, Err(Error::EmbeddingUnavailable)));
    assert_eq!(store.statistics().unwrap().total_memories, 0);
}

#[test]
fn test_metadata_roundtrip() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let metadata = json!({"user": "ninety", "priority": "high", "nested": {"n": 1}});
    store.add("with metadata", None, Some(&metadata)).unwrap();

    let records = store.list_all().unwrap();
    assert_eq!(records[0].metadata, metadata);
}

#[test]
fn test_search_ranks_by_similarity() {
    let provider = StubProvider::with_default(axis(0))
        .vector("record one", axis(1))
        .vector("record two", vec![0.0, 0.9, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0])
        .vector("record three", axis(3))
        .vector("query near record 2", axis(1));
    let store = test_store(provider);

    store.add("record one", Some(&["alpha".to_string()]), None).unwrap();
    let id2 = store
        .add("record two", Some(&["beta".to_string()]), None)
        .unwrap();
    store.add("record three", Some(&["gamma".to_string()]), None).unwrap();

    let results = store.search("query near record 2", 2, None).unwrap();
    assert!(results.len() <= 2);
    // "record one" embeds exactly on the query axis, "record two" close to it
    assert_eq!(results.len(), 2);
    assert!(results[0].similarity >= results[1].similarity);
    assert!(results.iter().any(|r| r.id == id2));
}

#[test]
fn test_search_never_exceeds_limit() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    for i in 0..10 {
        store.add(&format!("item {}", i), None, None).unwrap();
    }

    let results = store.search("item", 3, None).unwrap();
    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[test]
fn test_search_tag_filter_matches_any_position() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let fitness_tags = vec!["user-preference".to_string(), "fitness".to_string()];
    let id = store
        .add("user likes chest and back training", Some(&fitness_tags), None)
        .unwrap();
    let weather_tags = vec!["weather".to_string()];
    store
        .add("nice weather today", Some(&weather_tags), None)
        .unwrap();

    let filter = vec!["fitness".to_string()];
    let results = store.search("training", 5, Some(&filter)).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, id);
    assert!(results[0].tags.contains(&"fitness".to_string()));
}

#[test]
fn test_search_tag_filter_or_semantics() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    store
        .add("one", Some(&["alpha".to_string()]), None)
        .unwrap();
    store
        .add("two", Some(&["beta".to_string()]), None)
        .unwrap();
    store
        .add("three", Some(&["gamma".to_string()]), None)
        .unwrap();

    let filter = vec!["alpha".to_string(), "gamma".to_string()];
    let results = store.search("anything", 10, Some(&filter)).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn test_search_validates_before_provider_call() {
    // Provider would report "unavailable"; validation must fire first
    let store = test_store(StubProvider::unavailable());

    assert!(matches!(store.search("", 5, None), Err(Error::EmptyInput)));
    assert!(matches!(
        store.search("query", 0, None),
        Err(Error::Storage(crate::sqlite::Error::InvalidLimit(_)))
    ));
    assert!(matches!(
        store.search("query", 101, None),
        Err(Error::Storage(crate::sqlite::Error::InvalidLimit(_)))
    ));
}

#[test]
fn test_search_embedding_unavailable() {
    let store = test_store(StubProvider::unavailable());

    let result = store.search("query", 5, None);
    assert!(matches!(result, Err(Error::EmbeddingUnavailable)));
}

#[test]
fn test_search_ties_are_most_recent_first() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let id1 = store.add("first", None, None).unwrap();
    let id2 = store.add("second", None, None).unwrap();
    let id3 = store.add("third", None, None).unwrap();

    // All records share one embedding, so every similarity ties
    let results = store.search("query", 10, None).unwrap();
    let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![id3, id2, id1]);
}

#[test]
fn test_search_skips_undecodable_embedding() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let good_id = store.add("good record", None, None).unwrap();
    let bad_id = store.add("bad record", None, None).unwrap();

    // Corrupt the stored blob to a non-multiple-of-4 length
    store
        .db
        .conn()
        .execute(
            "UPDATE memories SET embedding = X'0102' WHERE id = ?1",
            [bad_id],
        )
        .unwrap();

    let results = store.search("query", 10, None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, good_id);

    // The corrupt record still shows up in raw listings
    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_search_dimension_mismatch_fails() {
    let provider = StubProvider::with_default(axis(0)).vector("short query", vec![1.0, 0.0]);
    let store = test_store(provider);

    store.add("eight dims", None, None).unwrap();

    let result = store.search("short query", 5, None);
    assert!(matches!(
        result,
        Err(Error::Storage(
            crate::sqlite::Error::MismatchedDimensions { .. }
        ))
    ));
}

#[test]
fn test_list_all_degrades_corrupt_metadata() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let metadata = json!({"key": "value"});
    let id = store.add("record", None, Some(&metadata)).unwrap();

    store
        .db
        .conn()
        .execute(
            "UPDATE memories SET metadata = '{not json' WHERE id = ?1",
            [id],
        )
        .unwrap();

    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].metadata, json!({}));
}

#[test]
fn test_delete_existing() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let id = store.add("to delete", None, None).unwrap();
    assert_eq!(store.statistics().unwrap().total_memories, 1);

    assert!(store.delete(id).unwrap());
    assert_eq!(store.statistics().unwrap().total_memories, 0);

    // The id is never reassigned
    let next_id = store.add("replacement", None, None).unwrap();
    assert!(next_id > id);
}

#[test]
fn test_delete_nonexistent_reports_false() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    store.add("only record", None, None).unwrap();
    assert!(!store.delete(9999).unwrap());
    assert_eq!(store.statistics().unwrap().total_memories, 1);
}

#[test]
fn test_delete_non_positive_id_rejected() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    assert!(matches!(store.delete(0), Err(Error::InvalidId(0))));
    assert!(matches!(store.delete(-3), Err(Error::InvalidId(-3))));
}

#[test]
fn test_clear_all_then_statistics() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let tags = vec!["alpha".to_string()];
    store.add("one", Some(&tags), None).unwrap();
    store.add("two", None, None).unwrap();

    let removed = store.clear_all().unwrap();
    assert_eq!(removed, 2);

    let stats = store.statistics().unwrap();
    assert_eq!(stats.total_memories, 0);
    assert!(stats.tag_distribution.is_empty());
    assert!(stats.earliest_memory.is_none());
    assert!(stats.latest_memory.is_none());
}

#[test]
fn test_statistics_per_tag_distribution() {
    let store = test_store(StubProvider::with_default(vec![0.5f32; 8]));

    let ab = vec!["a".to_string(), "b".to_string()];
    let ba = vec!["b".to_string(), "a".to_string()];
    store.add("one", Some(&ab), None).unwrap();
    store.add("two", Some(&ba), None).unwrap();

    let stats = store.statistics().unwrap();
    assert_eq!(stats.total_memories, 2);
    assert_eq!(stats.tag_distribution.get("a"), Some(&2));
    assert_eq!(stats.tag_distribution.get("b"), Some(&2));
    assert!(stats.earliest_memory.is_some());
    assert!(stats.latest_memory.is_some());
}

#[test]
fn test_statistics_raw_tag_distribution() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.database_path = dir.path().join("test.db");
    config.raw_tag_stats = true;
    std::mem::forget(dir);
    let store = MemoryStore::with_provider(
        config,
        Box::new(StubProvider::with_default(vec![0.5f32; 8])),
    )
    .unwrap();

    let ab = vec!["a".to_string(), "b".to_string()];
    let ba = vec!["b".to_string(), "a".to_string()];
    store.add("one", Some(&ab), None).unwrap();
    store.add("two", Some(&ba), None).unwrap();

    let stats = store.statistics().unwrap();
    assert_eq!(stats.tag_distribution.get("a,b"), Some(&1));
    assert_eq!(stats.tag_distribution.get("b,a"), Some(&1));
}

#[test]
fn test_store_rejects_path_traversal() {
    let mut config = Config::default();
    config.database_path = "/tmp/../etc/evil.db".into();

    let result =
        MemoryStore::with_provider(config, Box::new(StubProvider::with_default(vec![0.5f32; 8])));
    assert!(matches!(result, Err(Error::Config(_))));
}
