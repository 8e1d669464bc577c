//! Core memory store struct combining provider access and persistence.

use std::path::Path;

use crate::config::Config;
use crate::errors::Error;
use crate::provider::{EmbeddingProvider, HttpEmbeddingProvider};
use crate::sqlite::Database;

/// Maximum allowed content length (10,000 characters).
pub const MAX_CONTENT_LENGTH: usize = 10_000;

pub use crate::sqlite::search::{validate_limit, MAX_SEARCH_LIMIT};

/// Core memory store combining embedding retrieval and persistence.
///
/// Wraps a SQLite database and an embedding provider client to provide
/// semantic search over stored text memories. All operations are
/// synchronous and run to completion before returning; provider calls
/// are blocking but carry an explicit timeout.
pub struct MemoryStore {
    pub(crate) db: Database,
    pub(crate) provider: Box<dyn EmbeddingProvider>,
    pub(crate) config: Config,
}

impl MemoryStore {
    /// Initialize a memory store from an explicit configuration.
    ///
    /// Builds the HTTP embedding provider from the configured credentials;
    /// both `api_key` and `secret_key` must be present.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Configuration is invalid
    /// - Either provider credential is missing
    /// - Database path contains path traversal sequences (e.g., "../")
    /// - Parent directory cannot be canonicalized
    /// - Database cannot be opened
    pub fn new(config: Config) -> Result<Self, Error> {
        let provider = HttpEmbeddingProvider::new(
            &config.api_key,
            &config.secret_key,
            &config.api_base,
            config.request_timeout(),
        )?;
        Self::with_provider(config, Box::new(provider))
    }

    /// Initialize a memory store with an injected embedding provider.
    ///
    /// This is the seam for tests and for callers that bring their own
    /// provider transport; credentials are not required here.
    pub fn with_provider(
        config: Config,
        provider: Box<dyn EmbeddingProvider>,
    ) -> Result<Self, Error> {
        config.validate()?;
        validate_db_path(&config.database_path)?;

        let db = Database::open(&config.database_path)?;
        Ok(MemoryStore {
            db,
            provider,
            config,
        })
    }

    /// Validate content length (rejects empty and whitespace-only inputs).
    pub(crate) fn validate_content(text: &str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        if text.chars().count() > MAX_CONTENT_LENGTH {
            return Err(Error::InputTooLong {
                max_length: MAX_CONTENT_LENGTH,
                actual_length: text.chars().count(),
            });
        }
        Ok(())
    }

    /// Validate a tag list: no empty tags, no commas (the on-disk
    /// serialization is comma-joined).
    pub(crate) fn validate_tags(tags: &[String]) -> Result<(), Error> {
        for tag in tags {
            if tag.trim().is_empty() {
                return Err(Error::InvalidInput("Tags cannot be empty".to_string()));
            }
            if tag.contains(',') {
                return Err(Error::InvalidInput(format!(
                    "Tag '{}' must not contain commas",
                    tag
                )));
            }
        }
        Ok(())
    }

    /// Validate that a memory id is positive.
    pub(crate) fn validate_id(id: i64) -> Result<(), Error> {
        if id <= 0 {
            return Err(Error::InvalidId(id));
        }
        Ok(())
    }

    /// Request an embedding, mapping the provider's "no vector" outcome
    /// to `EmbeddingUnavailable`.
    pub(crate) fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        self.provider
            .embed(text, &self.config.embedding_model)?
            .ok_or(Error::EmbeddingUnavailable)
    }
}

/// Path traversal guard: reject parent directory components and require
/// an accessible parent directory.
fn validate_db_path(db_path: &Path) -> Result<(), Error> {
    use std::path::Component;

    for component in db_path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(Error::Config(
                "Invalid database path: contains '..' which may escape the intended directory"
                    .to_string(),
            ));
        }
    }

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::canonicalize(parent).map_err(|e| {
                Error::Config(format!(
                    "Invalid database path: parent directory not accessible: {}",
                    e
                ))
            })?;
        }
    }

    Ok(())
}
