//! AI Integration Layer
//!
//! Retry-bounded structured generation against a remote text-generation
//! endpoint.

pub mod client;
pub mod contract;
pub mod provider;
pub mod request;
pub mod retry;
pub mod timeout;
pub mod validation;

pub use client::{GenerationOutcome, GenerationResult, StructuredClient};
pub use contract::{ContractViolation, FieldKind, FieldValue, ResponseContract, StructuredFields};
pub use provider::{GeminiTransport, GenerateContentRequest, GenerationTransport, SharedTransport};
pub use request::{GenerationRequest, GenerationRequestBuilder, Role, Turn};
pub use retry::{AttemptRecord, AttemptStatus, RetryOutcome, RetryPolicy, with_retry};
pub use timeout::with_timeout;
