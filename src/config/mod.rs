//! Configuration system for muisti.
//!
//! The store takes an explicit `Config` struct at construction; there is
//! no hidden process-wide state. `Config::load` assembles one from
//! defaults, the TOML config file, and `MUISTI_*` environment overrides,
//! in that priority order.

mod loader;
mod overrides;
mod validation;

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::Error;

pub use loader::ConfigFile;

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Embedding provider API key.
    #[serde(default)]
    pub api_key: String,

    /// Embedding provider secret key.
    #[serde(default)]
    pub secret_key: String,

    /// Path to the SQLite database.
    #[serde(default)]
    pub database_path: PathBuf,

    /// Provider embedding model identifier.
    #[serde(default)]
    pub embedding_model: String,

    /// Base URL of the embedding provider API.
    #[serde(default)]
    pub api_base: String,

    /// Request timeout for provider calls, in seconds.
    #[serde(default)]
    pub request_timeout_secs: u64,

    /// Group tag statistics by the raw stored tag string instead of by
    /// individual tag (compatibility with the legacy aggregation).
    #[serde(default)]
    pub raw_tag_stats: bool,
}

impl Default for Config {
    fn default() -> Self {
        // Use home directory with sensible fallback for systems without HOME
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        let muisti_dir = home.join(".muisti");

        Self {
            api_key: String::new(),
            secret_key: String::new(),
            database_path: muisti_dir.join("memories.db"),
            embedding_model: "embedding-v1".to_string(),
            api_base: "https://qianfan.baidubce.com/v2".to_string(),
            request_timeout_secs: 30,
            raw_tag_stats: false,
        }
    }
}

impl Config {
    /// Load configuration with defaults, file values, and environment overrides.
    pub fn load() -> Result<Self, Error> {
        let file_config = loader::load_from_file()?;

        let mut config = Config::default();

        if let Some(file) = file_config {
            config.merge_from_file(file);
        }

        overrides::apply_env_overrides(
            &mut config.api_key,
            &mut config.secret_key,
            &mut config.database_path,
            &mut config.embedding_model,
            &mut config.api_base,
            &mut config.request_timeout_secs,
            &mut config.raw_tag_stats,
        )?;

        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if !file.api_key.is_empty() {
            self.api_key = file.api_key;
        }
        if !file.secret_key.is_empty() {
            self.secret_key = file.secret_key;
        }
        if !file.database_path.as_os_str().is_empty() {
            self.database_path = file.database_path;
        }
        if !file.embedding_model.is_empty() {
            self.embedding_model = file.embedding_model;
        }
        if !file.api_base.is_empty() {
            self.api_base = file.api_base;
        }
        self.request_timeout_secs = file.request_timeout_secs;
        self.raw_tag_stats = file.raw_tag_stats;
    }

    /// Validate configuration values.
    ///
    /// Credentials are checked later, when the HTTP provider is built.
    pub fn validate(&self) -> Result<(), Error> {
        let validator = validation::ConfigValidator {
            database_path: self.database_path.clone(),
            embedding_model: self.embedding_model.clone(),
            api_base: self.api_base.clone(),
            request_timeout_secs: self.request_timeout_secs,
        };

        validator.validate()
    }

    /// Provider request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Ensure the parent directory for the database path exists.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}
