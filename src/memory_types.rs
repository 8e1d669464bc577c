//! Memory store data types.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// A fully materialized memory as returned by `MemoryStore::list_all`.
///
/// The embedding stays in its stored serialized form (callers listing
/// memories rarely need the vector); metadata is decoded, degrading to an
/// empty object when the stored blob is corrupt.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryRecord {
    /// Unique identifier assigned at creation, never reused.
    pub id: i64,
    /// Stored text content.
    pub content: String,
    /// Raw serialized embedding bytes as persisted.
    pub embedding: Vec<u8>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Tags attached at creation.
    pub tags: Vec<String>,
    /// Decoded metadata; empty object when absent or corrupt.
    pub metadata: Value,
}

/// A single ranked result from `MemoryStore::search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Unique identifier of the matching memory.
    pub id: i64,
    /// Stored text content.
    pub content: String,
    /// Cosine similarity to the query embedding (-1.0 to 1.0).
    pub similarity: f64,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Tags attached at creation.
    pub tags: Vec<String>,
    /// Decoded metadata; empty object when absent or corrupt.
    pub metadata: Value,
}

/// Aggregate statistics over the whole store.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    /// Total number of stored memories.
    pub total_memories: u64,
    /// Tag occurrence counts (per tag, or per raw stored string when
    /// `Config::raw_tag_stats` is set).
    pub tag_distribution: BTreeMap<String, u64>,
    /// Creation timestamp of the oldest memory; None when empty.
    pub earliest_memory: Option<String>,
    /// Creation timestamp of the newest memory; None when empty.
    pub latest_memory: Option<String>,
}

/// Split a stored comma-joined tag string into tags.
pub(crate) fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
