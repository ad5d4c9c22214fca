//! venue-assist - Retry-bounded structured generation for venue recommendations
//!
//! A small client for a remote text-generation endpoint that obtains one
//! best-effort answer per request within a bounded number of attempts,
//! optionally constrained to a JSON response contract, plus the venue chat
//! and summary features built on top of it.
//!
//! ## Core Features
//!
//! - **Bounded Retry**: at most `max_attempts` deliveries, exponential backoff with jitter
//! - **Response Contracts**: typed field validation with a raw-text fallback
//! - **Always Renderable**: every call yields text, even when all attempts fail
//! - **Venue Assistant**: catalog-grounded chat and one-shot summaries
//!
//! ## Quick Start
//!
//! ```ignore
//! use venue_assist::{GenerationRequest, ResponseContract, RetryPolicy, StructuredClient};
//!
//! let client = StructuredClient::from_config(&config)?;
//! let request = GenerationRequest::builder("You recommend venues.")
//!     .user_text("Recommend a quiet coffee shop")
//!     .contract(ResponseContract::with_text_field("text").list_field("mentionedIds"))
//!     .build()?;
//! let result = client.generate(&request, &RetryPolicy::default()).await;
//! println!("{}", result.text);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: requests, contracts, retry, transport and the structured client
//! - [`assistant`]: venue chat sessions and summaries
//! - [`venue`]: the venue catalog used as reference data
//! - [`config`]: layered configuration

pub mod ai;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod constants;
pub mod types;
pub mod venue;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{AssistError, ErrorCategory, LlmError, Result};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    // Client
    GenerationOutcome,
    GenerationRequest,
    GenerationResult,
    StructuredClient,
    // Contracts
    FieldValue,
    ResponseContract,
    StructuredFields,
    // Retry
    AttemptRecord,
    RetryPolicy,
    // Transport
    GeminiTransport,
    GenerationTransport,
    SharedTransport,
    Turn,
};

// =============================================================================
// Assistant Re-exports
// =============================================================================

pub use assistant::{ChatAssistant, ChatReply, ChatSession, summarize_venue};
pub use venue::{Venue, VenueCatalog};
