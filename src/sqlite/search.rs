//! Candidate retrieval for semantic search.

use rusqlite::types::Value;

use super::{Database, Error, Memory};

pub type Result<T> = std::result::Result<T, Error>;

/// Maximum allowed limit for search operations.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Validate search limit is within acceptable bounds.
pub fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(Error::InvalidLimit(
            "Limit must be greater than 0".to_string(),
        ));
    }
    if limit > MAX_SEARCH_LIMIT {
        return Err(Error::InvalidLimit(format!(
            "Limit {} exceeds maximum allowed ({})",
            limit, MAX_SEARCH_LIMIT
        )));
    }
    Ok(())
}

/// Build the OR filter for one tag as exact token membership against the
/// comma-joined column: the whole string, its head, its tail, or between
/// two delimiters. A tag that is merely a substring of a stored tag does
/// not match.
fn tag_conditions(tag: &str, params: &mut Vec<Value>) -> String {
    params.push(Value::from(tag.to_string()));
    params.push(Value::from(format!("{},%", tag)));
    params.push(Value::from(format!("%,{}", tag)));
    params.push(Value::from(format!("%,{},%", tag)));
    "tags = ? OR tags LIKE ? OR tags LIKE ? OR tags LIKE ?".to_string()
}

impl Database {
    /// Fetch candidate memories for similarity ranking, newest first,
    /// optionally restricted to rows carrying at least one of the
    /// requested tags.
    ///
    /// Embeddings are returned as raw BLOBs; decoding and similarity
    /// scoring happen in the store layer so one corrupt row cannot fail
    /// the whole query.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub fn candidates(&self, tags: Option<&[String]>) -> Result<Vec<Memory>> {
        let mut params: Vec<Value> = Vec::new();
        let mut where_clause = String::new();

        if let Some(tags) = tags.filter(|t| !t.is_empty()) {
            let conditions: Vec<String> = tags
                .iter()
                .map(|tag| format!("({})", tag_conditions(tag, &mut params)))
                .collect();
            where_clause = format!("WHERE {}", conditions.join(" OR "));
        }

        let sql = format!(
            r#"
            SELECT id, content, embedding, created_at, tags, metadata
            FROM memories
            {}
            ORDER BY created_at DESC, id DESC
            "#,
            where_clause
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), |row| {
            Ok(Memory {
                id: row.get(0)?,
                content: row.get(1)?,
                embedding: row.get(2)?,
                created_at: row.get(3)?,
                tags: row.get(4)?,
                metadata: row.get(5)?,
            })
        })?;

        let mut memories = Vec::new();
        for row in rows {
            memories.push(row?);
        }
        Ok(memories)
    }
}
