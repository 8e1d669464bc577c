//! Environment variable overrides for configuration.

use std::path::PathBuf;

use crate::errors::Error;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Apply `MUISTI_*` environment overrides on top of the merged config.
#[allow(clippy::too_many_arguments)]
pub fn apply_env_overrides(
    api_key: &mut String,
    secret_key: &mut String,
    database_path: &mut PathBuf,
    embedding_model: &mut String,
    api_base: &mut String,
    request_timeout_secs: &mut u64,
    raw_tag_stats: &mut bool,
) -> Result<(), Error> {
    if let Some(value) = env_var("MUISTI_API_KEY") {
        *api_key = value;
    }
    if let Some(value) = env_var("MUISTI_SECRET_KEY") {
        *secret_key = value;
    }
    if let Some(value) = env_var("MUISTI_DATABASE_PATH") {
        *database_path = PathBuf::from(value);
    }
    if let Some(value) = env_var("MUISTI_EMBEDDING_MODEL") {
        *embedding_model = value;
    }
    if let Some(value) = env_var("MUISTI_API_BASE") {
        *api_base = value;
    }
    if let Some(value) = env_var("MUISTI_REQUEST_TIMEOUT_SECS") {
        *request_timeout_secs = value.parse().map_err(|_| {
            Error::Config(format!(
                "Invalid MUISTI_REQUEST_TIMEOUT_SECS: {value} (expected a positive integer)"
            ))
        })?;
    }
    if let Some(value) = env_var("MUISTI_RAW_TAG_STATS") {
        *raw_tag_stats = match value.as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(Error::Config(format!(
                    "Invalid MUISTI_RAW_TAG_STATS: {other} (expected true or false)"
                )))
            }
        };
    }

    Ok(())
}
