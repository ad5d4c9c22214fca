//! Unified Error Type System
//!
//! Centralized error types for the crate, plus classification of transport
//! failures into categories used for logging and attempt records.
//!
//! ## Error Categories
//!
//! - **RateLimit**: API rate limiting
//! - **Auth**: Authentication failures
//! - **Network**: Connectivity issues and timeouts
//! - **Transient**: Temporary server issues (5xx)
//! - **Unavailable**: Endpoint or model not found
//!
//! The structured generation client retries every transport failure up to its
//! attempt budget; the category only describes what went wrong.

use std::time::Duration;
use thiserror::Error;

use crate::constants::network::ERROR_BODY_PREVIEW_CHARS;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited (HTTP 429)
    RateLimit,
    /// Authentication failed (HTTP 401/403)
    Auth,
    /// Network/connectivity issues, including timeouts
    Network,
    /// Endpoint or model not found (HTTP 404)
    Unavailable,
    /// Invalid request (HTTP 400)
    BadRequest,
    /// Response body could not be decoded
    ParseError,
    /// Temporary server issues (HTTP 5xx)
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Transport-level error from the generation endpoint
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// HTTP status, when the endpoint answered
    pub status: Option<u16>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.provider, self.status) {
            (Some(provider), Some(status)) => {
                write!(f, "[{}:{}:{}] {}", provider, self.category, status, self.message)
            }
            (Some(provider), None) => write!(f, "[{}:{}] {}", provider, self.category, self.message),
            (None, _) => write!(f, "[{}] {}", self.category, self.message),
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    /// Create a new LLM error
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
            status: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
            status: None,
        }
    }

    /// Attach the HTTP status that produced this error
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport outcomes onto [`LlmError`]s
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify a non-success HTTP status
    pub fn classify_http_status(status: u16, body: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500..=599 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        let message = format!("HTTP {}: {}", status, preview(body));
        LlmError::with_provider(category, message, provider).status(status)
    }

    /// Classify a client-side transport failure (no HTTP status available)
    pub fn classify_reqwest(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() || err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() || err.is_body() {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };
        let llm_err = LlmError::with_provider(category, err.to_string(), provider);
        match err.status() {
            Some(status) => llm_err.status(status.as_u16()),
            None => llm_err,
        }
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    format!("{}...", head)
}

// =============================================================================
// Main Error Type
// =============================================================================

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured transport error with category
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl From<LlmError> for AssistError {
    fn from(err: LlmError) -> Self {
        AssistError::Llm(err)
    }
}

impl AssistError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        AssistError::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Category of this error, for attempt records and logs
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssistError::Llm(err) => err.category,
            AssistError::Timeout { .. } | AssistError::Http(_) | AssistError::Io(_) => {
                ErrorCategory::Network
            }
            AssistError::Json(_) => ErrorCategory::ParseError,
            AssistError::InvalidRequest(_) => ErrorCategory::BadRequest,
            AssistError::Config(_) | AssistError::Catalog(_) => ErrorCategory::Unknown,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AssistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Transient.to_string(), "TRANSIENT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_http_status() {
        let cases = [
            (429, ErrorCategory::RateLimit),
            (401, ErrorCategory::Auth),
            (403, ErrorCategory::Auth),
            (400, ErrorCategory::BadRequest),
            (404, ErrorCategory::Unavailable),
            (500, ErrorCategory::Transient),
            (503, ErrorCategory::Transient),
            (418, ErrorCategory::Unknown),
        ];
        for (status, expected) in cases {
            let err = ErrorClassifier::classify_http_status(status, "boom", "gemini");
            assert_eq!(err.category, expected, "status {}", status);
            assert_eq!(err.status, Some(status));
        }
    }

    #[test]
    fn test_error_body_is_truncated() {
        let body = "x".repeat(ERROR_BODY_PREVIEW_CHARS * 2);
        let err = ErrorClassifier::classify_http_status(500, &body, "gemini");
        assert!(err.message.ends_with("..."));
        assert!(err.message.len() < body.len());
    }

    #[test]
    fn test_llm_error_display() {
        let err = ErrorClassifier::classify_http_status(500, "internal", "gemini");
        assert_eq!(err.to_string(), "[gemini:TRANSIENT:500] HTTP 500: internal");

        let bare = LlmError::new(ErrorCategory::Network, "connection reset");
        assert_eq!(bare.to_string(), "[NETWORK] connection reset");
    }

    #[test]
    fn test_assist_error_category() {
        let llm: AssistError = LlmError::new(ErrorCategory::RateLimit, "slow down").into();
        assert_eq!(llm.category(), ErrorCategory::RateLimit);

        let timeout = AssistError::timeout("generation attempt", Duration::from_secs(1));
        assert_eq!(timeout.category(), ErrorCategory::Network);
        assert!(timeout.to_string().contains("generation attempt"));
    }
}
