//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{gemini, messages, network, retry};
use crate::types::{AssistError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Generation endpoint settings
    pub llm: LlmConfig,

    /// Retry policy settings
    pub retry: RetryConfig,

    /// User-facing messages
    pub messages: MessagesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(AssistError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(AssistError::Config("llm.model must not be empty".to_string()));
        }

        if self.retry.max_attempts == 0 {
            return Err(AssistError::Config(
                "retry.max_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key; falls back to the GEMINI_API_KEY environment variable.
    /// Never serialized to output.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// API base URL
    pub api_base: String,

    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: gemini::DEFAULT_MODEL.to_string(),
            api_base: gemini::DEFAULT_API_BASE.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub jitter_max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            base_delay_ms: retry::BASE_DELAY_MS,
            jitter_max_ms: retry::JITTER_MAX_MS,
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// First model turn of a chat session
    pub greeting: String,
    /// Chat answer when every attempt failed
    pub chat_fallback: String,
    /// Summary text when every attempt failed
    pub summary_fallback: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            greeting: messages::GREETING.to_string(),
            chat_fallback: messages::CHAT_FALLBACK.to_string(),
            summary_fallback: messages::SUMMARY_FALLBACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(AssistError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_never_serialized_or_printed() {
        let mut config = Config::default();
        config.llm.api_key = Some("top-secret".to_string());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("top-secret"));
        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
