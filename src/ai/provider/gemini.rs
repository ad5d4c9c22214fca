//! Gemini `generateContent` Transport
//!
//! Delivers one payload per call over HTTPS.
//! The API key travels as the `key` query parameter, matching the endpoint's
//! API-key authentication.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::{GenerateContentRequest, GenerationTransport};
use crate::config::LlmConfig;
use crate::constants::gemini::{API_KEY_ENV, PROVIDER};
use crate::types::{AssistError, ErrorClassifier, Result};

/// HTTP transport for the Gemini generation endpoint
pub struct GeminiTransport {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    endpoint: Url,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiTransport {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .ok_or_else(|| {
                AssistError::Config(format!(
                    "Gemini API key not found. Set {} or llm.api_key in config",
                    API_KEY_ENV
                ))
            })?;

        let endpoint = Self::endpoint_url(&config.api_base, &config.model)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            endpoint,
            model: config.model.clone(),
            client,
        })
    }

    /// `{api_base}/models/{model}:generateContent`, without the key
    fn endpoint_url(api_base: &str, model: &str) -> Result<Url> {
        let raw = format!(
            "{}/models/{}:generateContent",
            api_base.trim_end_matches('/'),
            model
        );
        Url::parse(&raw)
            .map_err(|e| AssistError::Config(format!("Invalid Gemini endpoint '{}': {}", raw, e)))
    }

    fn keyed_endpoint(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        url
    }
}

#[async_trait]
impl GenerationTransport for GeminiTransport {
    async fn send(&self, payload: &GenerateContentRequest) -> Result<String> {
        let start_time = Instant::now();
        debug!(model = %self.model, turns = payload.contents.len(), "Posting generateContent");

        let response = self
            .client
            .post(self.keyed_endpoint())
            .json(payload)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_reqwest(&e.without_url(), PROVIDER))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ErrorClassifier::classify_reqwest(&e.without_url(), PROVIDER))?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            bytes = body.len(),
            "generateContent answered"
        );

        if !status.is_success() {
            return Err(ErrorClassifier::classify_http_status(status.as_u16(), &body, PROVIDER).into());
        }

        Ok(body)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
