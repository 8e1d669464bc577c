//! Lifecycle operations for the memory store.

use serde_json::Value;
use tracing::warn;

use crate::errors::Error;
use crate::memory_types::{split_tags, MemoryRecord, StatsSummary};

use super::store::MemoryStore;

impl MemoryStore {
    #[must_use = "handle the error or the generated id is lost"]
    /// Add a memory, returning the generated id.
    ///
    /// Validation short-circuits before any side effect: content must be
    /// non-empty and at most 10,000 characters, tags must be simple
    /// comma-free tokens, metadata must be a JSON object. The embedding
    /// is requested before anything is persisted, so a provider failure
    /// leaves the store untouched.
    ///
    /// # Arguments
    ///
    /// * `content` - Text content to store
    /// * `tags` - Optional tags for filtered retrieval
    /// * `metadata` - Optional JSON object attached to the memory
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Content is empty or exceeds 10,000 characters
    /// - A tag is empty or contains a comma
    /// - Metadata is not a JSON object
    /// - The provider returns no vector (`EmbeddingUnavailable`)
    /// - The database insert fails
    pub fn add(
        &self,
        content: &str,
        tags: Option<&[String]>,
        metadata: Option<&Value>,
    ) -> Result<i64, Error> {
        Self::validate_content(content)?;
        if let Some(tags) = tags {
            Self::validate_tags(tags)?;
        }
        if let Some(metadata) = metadata {
            if !metadata.is_object() {
                return Err(Error::InvalidInput(
                    "Metadata must be a JSON object".to_string(),
                ));
            }
        }

        let embedding = self.embed(content)?;

        let tags_str = tags.map(|t| t.join(",")).unwrap_or_default();
        let metadata_str = match metadata {
            Some(value) => serde_json::to_string(value)?,
            None => "{}".to_string(),
        };

        let id = self
            .db
            .insert(content, &embedding, &tags_str, &metadata_str)?;
        Ok(id)
    }

    #[must_use = "handle the error or results may be lost"]
    /// List every memory, newest first.
    ///
    /// Embeddings stay in serialized form. A record with corrupt metadata
    /// degrades to an empty metadata object rather than being dropped;
    /// listing prioritizes completeness over vector validity.
    pub fn list_all(&self) -> Result<Vec<MemoryRecord>, Error> {
        let rows = self.db.list_all()?;

        let records = rows
            .into_iter()
            .map(|row| {
                let metadata = decode_metadata(row.id, &row.metadata);
                MemoryRecord {
                    id: row.id,
                    content: row.content,
                    embedding: row.embedding,
                    created_at: row.created_at,
                    tags: split_tags(&row.tags),
                    metadata,
                }
            })
            .collect();

        Ok(records)
    }

    #[must_use = "handle the error or results may be lost"]
    /// Delete a memory by id.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the memory was deleted
    /// - `Ok(false)` if no memory had that id
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidId` for non-positive ids.
    pub fn delete(&self, id: i64) -> Result<bool, Error> {
        Self::validate_id(id)?;
        Ok(self.db.delete(id)?)
    }

    #[must_use = "handle the error or results may be lost"]
    /// Remove all memories unconditionally, returning how many were
    /// removed. Irreversible; confirmation belongs to the caller.
    pub fn clear_all(&self) -> Result<usize, Error> {
        Ok(self.db.delete_all()?)
    }

    #[must_use = "handle the error or results may be lost"]
    /// Aggregate statistics: total count, tag distribution, and the
    /// earliest/latest creation timestamps (both None when empty).
    pub fn statistics(&self) -> Result<StatsSummary, Error> {
        let total_memories = self.db.count()?;
        let tag_distribution = self.db.tag_distribution(self.config.raw_tag_stats)?;
        let (earliest_memory, latest_memory) = match self.db.time_range()? {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };

        Ok(StatsSummary {
            total_memories,
            tag_distribution,
            earliest_memory,
            latest_memory,
        })
    }
}

/// Decode stored metadata JSON, degrading to an empty object on corruption.
pub(crate) fn decode_metadata(id: i64, raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Object(Default::default());
    }
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(id, error = %e, "corrupt metadata; using empty object");
            Value::Object(Default::default())
        }
    }
}
