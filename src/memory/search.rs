//! Similarity-ranked search over stored memories.

use tracing::warn;

use crate::errors::Error;
use crate::memory_types::{split_tags, SearchResult};
use crate::sqlite::embedding::{blob_to_vec, cosine_similarity};

use super::crud::decode_metadata;
use super::store::{validate_limit, MemoryStore};

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// Search memories by semantic similarity.
    ///
    /// Embeds the query, scans the tag-filtered candidate set (OR across
    /// tags, exact token membership), scores each candidate with cosine
    /// similarity, and returns the top `limit` results sorted by
    /// similarity descending. Candidates are fetched newest-first and the
    /// sort is stable, so equal-similarity results stay most-recent-first.
    ///
    /// A candidate whose stored embedding cannot be decoded is skipped
    /// with a warning; a decodable embedding with the wrong dimensionality
    /// fails the whole search, since that means records from a different
    /// model are being compared.
    ///
    /// # Arguments
    ///
    /// * `query` - Search query text (1 to 10,000 characters)
    /// * `limit` - Maximum number of results (1 to 100)
    /// * `tags` - Optional tag filter; a record matches if it carries any
    ///   requested tag
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Query is empty or exceeds 10,000 characters
    /// - Limit is outside [1, 100]
    /// - The provider returns no vector (`EmbeddingUnavailable`)
    /// - A candidate embedding has mismatched dimensions
    /// - Database operations fail
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        tags: Option<&[String]>,
    ) -> Result<Vec<SearchResult>, Error> {
        // Validate everything before touching the provider or storage
        validate_limit(limit)?;
        let query = query.trim();
        Self::validate_content(query)?;
        if let Some(tags) = tags {
            Self::validate_tags(tags)?;
        }

        let query_embedding = self.embed(query)?;

        let candidates = self.db.candidates(tags)?;

        let mut results: Vec<SearchResult> = Vec::with_capacity(candidates.len());
        for row in candidates {
            let stored_embedding = match blob_to_vec(&row.embedding) {
                Ok(vec) => vec,
                Err(e) => {
                    warn!(id = row.id, error = %e, "skipping memory with undecodable embedding");
                    continue;
                }
            };

            let similarity = cosine_similarity(&query_embedding, &stored_embedding)?;
            let metadata = decode_metadata(row.id, &row.metadata);

            results.push(SearchResult {
                id: row.id,
                content: row.content,
                similarity,
                created_at: row.created_at,
                tags: split_tags(&row.tags),
                metadata,
            });
        }

        // Stable sort keeps the newest-first candidate order for ties
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(limit);
        Ok(results)
    }
}
