//! JSON response types and formatting for CLI output.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Response for successful memory addition.
#[derive(Serialize)]
pub struct AddResponse {
    pub status: String,
    pub id: i64,
}

/// Response for search results.
#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}

/// Individual search result item.
#[derive(Serialize)]
pub struct SearchResultItem {
    pub id: i64,
    pub content: String,
    pub similarity: f64,
    pub created_at: String,
    pub tags: Vec<String>,
    pub metadata: Value,
}

/// Response for listing memories.
#[derive(Serialize)]
pub struct ListResponse {
    pub memories: Vec<ListItem>,
}

/// Individual list item.
#[derive(Serialize)]
pub struct ListItem {
    pub id: i64,
    pub content: String,
    pub created_at: String,
    pub tags: Vec<String>,
    pub metadata: Value,
}

/// Response for successful memory deletion.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub status: String,
    pub id: i64,
}

/// Response for clearing all memories.
#[derive(Serialize)]
pub struct ClearResponse {
    pub status: String,
    pub removed: usize,
}

/// Response for store statistics.
#[derive(Serialize)]
pub struct StatsResponse {
    pub total_memories: u64,
    pub tag_distribution: BTreeMap<String, u64>,
    pub earliest_memory: Option<String>,
    pub latest_memory: Option<String>,
}

/// Response for errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}
