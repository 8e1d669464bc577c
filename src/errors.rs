//! Error types for muisti.

use thiserror::Error;

/// Main error type for muisti operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input was empty or whitespace-only.
    #[error("Input cannot be empty")]
    EmptyInput,

    /// Input exceeded the maximum allowed length.
    #[error("Input too long: {actual_length} characters (maximum {max_length})")]
    InputTooLong {
        max_length: usize,
        actual_length: usize,
    },

    /// Malformed input (bad tags, out-of-range limit, and so on).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A memory id must be a positive integer.
    #[error("Invalid memory id: {0} (must be positive)")]
    InvalidId(i64),

    /// The embedding provider returned no vector for the input.
    #[error("Embedding unavailable: provider returned no vector")]
    EmbeddingUnavailable,

    /// SQLite error.
    #[error("SQLite error: {0}")]
    SQLite(#[from] rusqlite::Error),

    /// Storage backend error (blob codec, similarity, limit validation).
    #[error(transparent)]
    Storage(#[from] crate::sqlite::Error),

    /// Embedding provider HTTP transport error.
    #[error("Embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Embedding provider returned an unusable response body.
    #[error("Embedding response error: {0}")]
    Provider(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error. Fatal at construction time.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory not found (CLI-level failure for delete by id).
    #[error("Memory not found: {0}")]
    NotFound(i64),
}
