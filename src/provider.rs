//! Embedding provider client for text-to-vector conversion.
//!
//! The provider is an external service: it may fail transiently, and it
//! may legitimately return no vector at all. `Ok(None)` models that
//! "no embedding available" outcome so callers can decide what it means.

use std::time::Duration;

use serde_json::Value;

use crate::errors::Error;

/// Source of embedding vectors for stored and queried text.
///
/// `Ok(None)` means the provider had no vector for this input; it is a
/// first-class outcome, not an error.
pub trait EmbeddingProvider {
    fn embed(&self, text: &str, model: &str) -> Result<Option<Vec<f32>>, Error>;
}

/// Blocking HTTP client for a remote embedding API.
///
/// POSTs `{"model": ..., "input": ...}` to `{api_base}/embeddings` with
/// bearer auth and reads the vector out of `data[0].embedding`. Every
/// request carries an explicit timeout so a stalled provider cannot block
/// the store indefinitely.
pub struct HttpEmbeddingProvider {
    client: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
    secret_key: String,
}

impl HttpEmbeddingProvider {
    /// Build a provider client from credentials and endpoint settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming both expected credentials if either
    /// is missing, or if the HTTP client cannot be constructed.
    pub fn new(
        api_key: &str,
        secret_key: &str,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if api_key.trim().is_empty() || secret_key.trim().is_empty() {
            return Err(Error::Config(
                "Missing embedding provider credentials: both api_key and secret_key \
                 are required (set MUISTI_API_KEY and MUISTI_SECRET_KEY)"
                    .to_string(),
            ));
        }

        let api_base = api_base.trim_end_matches('/');
        if api_base.is_empty() {
            return Err(Error::Config(
                "Embedding api_base must not be empty".to_string(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.to_string(),
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }
}

impl EmbeddingProvider for HttpEmbeddingProvider {
    fn embed(&self, text: &str, model: &str) -> Result<Option<Vec<f32>>, Error> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .header("X-Api-Secret", &self.secret_key)
            .json(&serde_json::json!({
                "model": model,
                "input": text,
            }))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::Provider(format!(
                "provider returned HTTP {}: {}",
                status.as_u16(),
                body.chars().take(240).collect::<String>()
            )));
        }

        let payload: Value = response.json()?;
        parse_embedding_response(&payload)
    }
}

/// Extract the first embedding vector from a provider response body.
///
/// A response with no `data` entries, or an empty embedding array, is
/// reported as `Ok(None)`; a present-but-malformed embedding is an error.
pub(crate) fn parse_embedding_response(payload: &Value) -> Result<Option<Vec<f32>>, Error> {
    let data = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Provider("response missing data array".to_string()))?;

    let Some(item) = data.first() else {
        return Ok(None);
    };

    let raw = item
        .get("embedding")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Provider("data item missing embedding array".to_string()))?;

    if raw.is_empty() {
        return Ok(None);
    }

    let vector = raw
        .iter()
        .map(|component| {
            component
                .as_f64()
                .map(|value| value as f32)
                .ok_or_else(|| Error::Provider("embedding component must be numeric".to_string()))
        })
        .collect::<Result<Vec<f32>, Error>>()?;

    Ok(Some(vector))
}
