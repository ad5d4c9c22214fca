//! Generation Transport Abstraction
//!
//! Defines the [`GenerationTransport`] trait: one outbound request per call,
//! no retries. Retrying, backoff and answer interpretation belong to
//! [`crate::ai::client::StructuredClient`], so any transport (HTTP, scripted
//! test double) gets identical semantics.

mod gemini;
mod models;

pub use gemini::GeminiTransport;
pub use models::{
    Candidate, CandidateContent, CandidatePart, Content, ContentResponse, GenerateContentRequest,
    GenerationConfig, Part, PromptFeedback, SystemInstruction, UsageMetadata,
};

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::Result;

/// Shared transport type for concurrent use across callers.
pub type SharedTransport = Arc<dyn GenerationTransport>;

/// A single-shot delivery of a generation payload
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    /// Deliver one payload.
    ///
    /// `Ok(body)` means the endpoint answered with a success status; the body
    /// is returned untouched. Transport failures and non-success statuses are
    /// returned as errors.
    async fn send(&self, payload: &GenerateContentRequest) -> Result<String>;

    /// Transport name for logging
    fn name(&self) -> &str;
}
