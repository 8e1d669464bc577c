//! Configuration validation logic.

use crate::errors::Error;
use std::path::PathBuf;

/// Validates configuration values.
pub struct ConfigValidator {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
    /// Provider embedding model identifier.
    pub embedding_model: String,
    /// Base URL of the embedding provider API.
    pub api_base: String,
    /// Request timeout for provider calls, in seconds.
    pub request_timeout_secs: u64,
}

impl ConfigValidator {
    /// Validate all configuration values for correctness and constraints.
    ///
    /// Checks that:
    /// - Database path is not empty
    /// - Embedding model is not empty
    /// - API base URL is not empty
    /// - Request timeout is positive
    ///
    /// Credentials are deliberately not checked here: they are only
    /// required when the HTTP provider is constructed, so stores built
    /// with an injected provider stay usable without them.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any validation check fails.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_database_path()?;
        self.validate_embedding_model()?;
        self.validate_api_base()?;
        self.validate_timeout()?;

        Ok(())
    }

    fn validate_database_path(&self) -> Result<(), Error> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        Ok(())
    }

    fn validate_embedding_model(&self) -> Result<(), Error> {
        if self.embedding_model.trim().is_empty() {
            return Err(Error::Config("Embedding model cannot be empty".to_string()));
        }

        Ok(())
    }

    fn validate_api_base(&self) -> Result<(), Error> {
        if self.api_base.trim().is_empty() {
            return Err(Error::Config(
                "Embedding api_base cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_timeout(&self) -> Result<(), Error> {
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "Request timeout must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}
