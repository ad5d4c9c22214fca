//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Retry policy constants
pub mod retry {
    /// Maximum attempts per generation call
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 1000;

    /// Upper bound of the random jitter added to each backoff (milliseconds)
    pub const JITTER_MAX_MS: u64 = 1000;
}

/// Network constants
pub mod network {
    /// Default per-attempt request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Maximum characters of an error body kept in error messages
    pub const ERROR_BODY_PREVIEW_CHARS: usize = 300;
}

/// Generation endpoint constants
pub mod gemini {
    /// Provider name used in logs and errors
    pub const PROVIDER: &str = "gemini";

    /// Default API base URL
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default model
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

    /// Environment variable consulted when no API key is configured
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

    /// MIME type requested when a response contract is present
    pub const JSON_MIME_TYPE: &str = "application/json";
}

/// User-facing messages
pub mod messages {
    /// Shown when every chat attempt failed
    pub const CHAT_FALLBACK: &str =
        "Sorry, something went wrong while talking to the assistant. Please try again.";

    /// Shown when a venue summary could not be generated
    pub const SUMMARY_FALLBACK: &str = "The summary could not be generated.";

    /// First model turn of every chat session
    pub const GREETING: &str =
        "Hi! I'm your AI assistant. How can I help you find the perfect place?";
}
