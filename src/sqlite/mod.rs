//! SQLite backend for muisti memory storage.
//!
//! This module provides:
//! - `Database`: Core SQLite connection and schema management
//! - `Memory`: Row-level data structure for stored memories
//! - `embedding`: BLOB conversion and cosine similarity
//! - `search`: Recency-ordered candidate retrieval with tag filtering

pub mod embedding;
pub mod search;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, Result as SqliteResult};

pub use self::embedding::{blob_to_vec, cosine_similarity, vec_to_blob};

/// A single memory row as stored in SQLite.
///
/// The embedding stays in its serialized BLOB form and metadata stays as
/// raw JSON text; decoding policy (skip vs. degrade) belongs to the store
/// layer above.
#[derive(Clone)]
pub struct Memory {
    pub id: i64,
    pub content: String,
    pub embedding: Vec<u8>,
    pub created_at: String,
    pub tags: String,
    pub metadata: String,
}

/// Error types for SQLite operations.
#[derive(Debug)]
pub enum Error {
    Sqlite(String),
    InvalidBlobSize { actual: usize },
    MismatchedDimensions { expected: usize, actual: usize },
    EmptyVector,
    InvalidEmbedding(String),
    InvalidLimit(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Sqlite(msg) => write!(f, "Database error: {}", msg),
            Error::InvalidBlobSize { actual } => {
                write!(
                    f,
                    "Invalid BLOB size: {} bytes is not a positive multiple of 4",
                    actual
                )
            }
            Error::MismatchedDimensions { expected, actual } => {
                write!(
                    f,
                    "Mismatched dimensions: expected {} dimensions, got {} dimensions",
                    expected, actual
                )
            }
            Error::EmptyVector => write!(f, "Cannot operate on an empty vector"),
            Error::InvalidEmbedding(msg) => write!(f, "Invalid embedding: {}", msg),
            Error::InvalidLimit(msg) => write!(f, "Invalid limit: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Sqlite(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// SQLite database backend for muisti.
pub struct Database {
    conn: Connection,
}

/// Initialize database schema and indexes.
///
/// AUTOINCREMENT keeps deleted ids from ever being reassigned.
fn create_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS memories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT NOT NULL,
            embedding BLOB NOT NULL,
            created_at TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '',
            metadata TEXT NOT NULL DEFAULT '{}'
        );

        CREATE INDEX IF NOT EXISTS idx_memories_created_at ON memories(created_at);
        CREATE INDEX IF NOT EXISTS idx_memories_tags ON memories(tags);
        "#,
    )?;
    Ok(())
}

impl Database {
    /// Open or create a SQLite database at the given path.
    ///
    /// Initializes the schema if the database is new.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: &Path) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        create_schema(&mut conn)?;
        Ok(Self { conn })
    }

    /// Insert a new memory with its embedding, returning the generated id.
    ///
    /// Single atomic INSERT; the row either fully exists or does not.
    ///
    /// # Errors
    ///
    /// Returns error if the embedding is empty or the database write fails.
    pub fn insert(
        &self,
        content: &str,
        embedding: &[f32],
        tags: &str,
        metadata: &str,
    ) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let blob = vec_to_blob(embedding)?;

        self.conn.execute(
            r#"
            INSERT INTO memories (content, embedding, created_at, tags, metadata)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![content, &blob, &now, tags, metadata],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a memory with an explicit timestamp (for testing).
    #[cfg(test)]
    pub(crate) fn insert_with_time(
        &self,
        content: &str,
        embedding: &[f32],
        tags: &str,
        metadata: &str,
        created_at: &str,
    ) -> Result<i64> {
        let blob = vec_to_blob(embedding)?;

        self.conn.execute(
            r#"
            INSERT INTO memories (content, embedding, created_at, tags, metadata)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![content, &blob, created_at, tags, metadata],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// List all memories, ordered by creation time (newest first).
    ///
    /// Embeddings are returned in their raw BLOB form; rows are never
    /// dropped here regardless of blob or metadata state.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub fn list_all(&self) -> Result<Vec<Memory>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, content, embedding, created_at, tags, metadata
            FROM memories
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let memories: SqliteResult<Vec<Memory>> = stmt
            .query_map([], |row| {
                Ok(Memory {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    embedding: row.get(2)?,
                    created_at: row.get(3)?,
                    tags: row.get(4)?,
                    metadata: row.get(5)?,
                })
            })?
            .collect();

        Ok(memories?)
    }

    /// Delete a memory by id.
    ///
    /// Returns true if a memory was deleted, false if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM memories WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete all memories, returning how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    pub fn delete_all(&self) -> Result<usize> {
        let rows = self.conn.execute("DELETE FROM memories", [])?;
        Ok(rows)
    }

    /// Total number of stored memories.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Earliest and latest creation timestamps, or None when empty.
    pub fn time_range(&self) -> Result<Option<(String, String)>> {
        let range: (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(created_at), MAX(created_at) FROM memories",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        match range {
            (Some(min), Some(max)) => Ok(Some((min, max))),
            _ => Ok(None),
        }
    }

    /// Tag occurrence counts.
    ///
    /// With `raw` set, groups by the stored comma-joined string exactly as
    /// the rows were written ("a,b" and "b,a" count separately). Otherwise
    /// each individual tag contributes to its own bucket.
    pub fn tag_distribution(&self, raw: bool) -> Result<BTreeMap<String, u64>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT tags, COUNT(*)
            FROM memories
            WHERE tags != ''
            GROUP BY tags
            "#,
        )?;

        let groups: SqliteResult<Vec<(String, i64)>> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect();

        let mut distribution = BTreeMap::new();
        for (tags, count) in groups? {
            if raw {
                *distribution.entry(tags).or_insert(0) += count as u64;
            } else {
                for tag in tags.split(',').filter(|t| !t.is_empty()) {
                    *distribution.entry(tag.to_string()).or_insert(0) += count as u64;
                }
            }
        }

        Ok(distribution)
    }

    /// Get internal connection (for internal use, e.g., tests).
    #[allow(dead_code)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
