//! Structured Generation Client
//!
//! Obtains one best-effort answer from the generation endpoint within a
//! bounded number of attempts.
//!
//! ## Strategy
//!
//! 1. Build the payload once (system instruction, history, latest turn,
//!    optional response schema)
//! 2. Deliver it through [`with_retry`]; every transport failure or
//!    non-success status consumes one attempt
//! 3. The first success is terminal, whatever its body looks like
//! 4. Interpret the body: structured fields when the contract validates,
//!    raw text otherwise
//! 5. If every attempt failed, answer with the fallback message
//!
//! `generate` always returns a renderable [`GenerationResult`]; it never
//! returns an error and holds no state between calls.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::contract::StructuredFields;
use super::provider::{GenerateContentRequest, GeminiTransport, SharedTransport};
use super::request::GenerationRequest;
use super::retry::{AttemptRecord, RetryPolicy, with_retry};
use super::timeout::with_timeout;
use super::validation::{ExtractedAnswer, extract_answer};
use crate::config::Config;
use crate::constants::{messages, network};
use crate::types::{AssistError, Result};

/// How a generation call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Contract requested and the answer satisfied it
    Structured(StructuredFields),
    /// No contract requested; the answer is plain text
    PlainText,
    /// The endpoint answered, but not in the requested shape
    ParseFallback { reason: String },
    /// Every attempt failed at the transport level
    Exhausted { last_error: String },
}

/// Terminal result of one generation call
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Always renderable: answer text, raw fallback text, or the failure message
    pub text: String,
    pub outcome: GenerationOutcome,
    /// One record per attempt made, in order
    pub attempts: Vec<AttemptRecord>,
}

impl GenerationResult {
    /// Whether the endpoint answered successfully
    pub fn succeeded(&self) -> bool {
        !matches!(self.outcome, GenerationOutcome::Exhausted { .. })
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts.len() as u32
    }

    /// Validated fields; empty unless the outcome is `Structured`
    pub fn structured_fields(&self) -> StructuredFields {
        match &self.outcome {
            GenerationOutcome::Structured(fields) => fields.clone(),
            _ => StructuredFields::default(),
        }
    }

    pub fn is_parse_fallback(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::ParseFallback { .. })
    }
}

/// Bounded-retry client for structured generation
#[derive(Clone)]
pub struct StructuredClient {
    transport: SharedTransport,
    fallback_message: String,
    attempt_timeout: Duration,
}

impl std::fmt::Debug for StructuredClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredClient")
            .field("transport", &self.transport.name())
            .field("fallback_message", &self.fallback_message)
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}

impl StructuredClient {
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            transport,
            fallback_message: messages::CHAT_FALLBACK.to_string(),
            attempt_timeout: Duration::from_secs(network::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Client over the Gemini transport, configured from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = GeminiTransport::new(&config.llm)?;
        Ok(Self::new(Arc::new(transport))
            .with_fallback_message(config.messages.chat_fallback.clone())
            .with_attempt_timeout(Duration::from_secs(config.llm.timeout_secs)))
    }

    /// Message returned when every attempt fails
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Upper bound for a single attempt
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Generate one answer for `request` within `policy`'s attempt budget
    #[instrument(
        skip_all,
        fields(
            request_id = %Uuid::new_v4(),
            transport = self.transport.name(),
            contract = request.contract().is_some(),
            history = request.history().len(),
        )
    )]
    pub async fn generate(&self, request: &GenerationRequest, policy: &RetryPolicy) -> GenerationResult {
        let payload = GenerateContentRequest::from_request(request);
        let transport = self.transport.as_ref();
        let payload_ref = &payload;
        let attempt_timeout = self.attempt_timeout;

        let outcome = with_retry(policy, move |_attempt| async move {
            with_timeout(
                attempt_timeout,
                transport.send(payload_ref),
                "generation attempt",
            )
            .await
        })
        .await;

        let attempts = outcome.attempts;
        let result = match outcome.result {
            Ok(body) => self.interpret(request, &body, attempts),
            Err(err) => self.exhausted(err, attempts),
        };

        info!(
            attempts = result.attempts_used(),
            succeeded = result.succeeded(),
            parse_fallback = result.is_parse_fallback(),
            "Generation finished"
        );
        result
    }

    /// Like [`Self::generate`], but gives up as soon as `token` is cancelled
    ///
    /// Returns `None` when cancelled; the in-flight attempt and any pending
    /// backoff are dropped and no further attempts are made.
    pub async fn generate_cancellable(
        &self,
        request: &GenerationRequest,
        policy: &RetryPolicy,
        token: &CancellationToken,
    ) -> Option<GenerationResult> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!("Generation cancelled by caller");
                None
            }
            result = self.generate(request, policy) => Some(result),
        }
    }

    fn interpret(
        &self,
        request: &GenerationRequest,
        body: &str,
        attempts: Vec<AttemptRecord>,
    ) -> GenerationResult {
        let answer = match extract_answer(body) {
            ExtractedAnswer::Candidate(text) | ExtractedAnswer::Raw(text) => text,
            ExtractedAnswer::Empty => {
                warn!("Endpoint answered without any text");
                return GenerationResult {
                    text: self.fallback_message.clone(),
                    outcome: GenerationOutcome::ParseFallback {
                        reason: "response contained no text".to_string(),
                    },
                    attempts,
                };
            }
        };

        let Some(contract) = request.contract() else {
            return GenerationResult {
                text: answer,
                outcome: GenerationOutcome::PlainText,
                attempts,
            };
        };

        match contract.parse(&answer) {
            Ok(fields) => {
                let text = match fields.text(contract.text_field_name()) {
                    Some(text) if !text.trim().is_empty() => text.to_string(),
                    _ => {
                        warn!("Structured answer has a blank text field, using fallback message");
                        self.fallback_message.clone()
                    }
                };
                GenerationResult {
                    text,
                    outcome: GenerationOutcome::Structured(fields),
                    attempts,
                }
            }
            Err(violation) => {
                warn!(reason = %violation, "Answer did not match contract, using raw text");
                GenerationResult {
                    text: answer,
                    outcome: GenerationOutcome::ParseFallback {
                        reason: violation.to_string(),
                    },
                    attempts,
                }
            }
        }
    }

    fn exhausted(&self, err: AssistError, attempts: Vec<AttemptRecord>) -> GenerationResult {
        warn!(attempts = attempts.len(), error = %err, "All generation attempts failed");
        GenerationResult {
            text: self.fallback_message.clone(),
            outcome: GenerationOutcome::Exhausted {
                last_error: err.to_string(),
            },
            attempts,
        }
    }
}
