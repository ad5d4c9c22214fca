//! Bounded Retry with Exponential Backoff
//!
//! [`with_retry`] drives any asynchronous operation through a [`RetryPolicy`]:
//! attempts run strictly in sequence, and between two failed attempts the
//! caller sleeps `base_delay * 2^index + uniform(0, jitter_max)`, where
//! `index` is 0 after the first attempt. No delay follows the last attempt.
//!
//! The combinator never panics and never loops past `max_attempts`; it hands
//! back either the first success or the last error, together with a record of
//! every attempt made.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::constants::retry as retry_constants;
use crate::types::{AssistError, ErrorCategory, LlmError, Result};

/// Retry bounds for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first one
    ///
    /// `0` is read as `1`: every call makes at least one attempt. Configs
    /// loaded through `Config::validate` reject `0` outright.
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled for every later one
    pub base_delay: Duration,
    /// Upper bound of the random jitter added to every delay
    pub jitter_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::MAX_ATTEMPTS,
            base_delay: Duration::from_millis(retry_constants::BASE_DELAY_MS),
            jitter_max: Duration::from_millis(retry_constants::JITTER_MAX_MS),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            jitter_max: Duration::from_millis(config.jitter_max_ms),
        }
    }
}

impl RetryPolicy {
    /// Policy that never sleeps; for tests and offline tooling
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    /// Attempts actually made; a zero budget still allows one attempt
    pub fn attempt_budget(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Deterministic part of the delay after failed attempt `index` (0-based)
    pub fn delay_for(&self, index: u32) -> Duration {
        let factor = 1u32.checked_shl(index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// [`Self::delay_for`] plus uniform jitter in `0..=jitter_max`
    pub fn jittered_delay_for(&self, index: u32) -> Duration {
        self.delay_for(index).saturating_add(random_jitter(self.jitter_max))
    }
}

/// Generate random jitter using thread-local RNG
fn random_jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

/// How one attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    Succeeded,
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

/// One entry of the per-call attempt log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt: u32,
    pub status: AttemptStatus,
    /// Delay slept after this attempt, if another one followed
    pub backoff: Option<Duration>,
    /// Time spent in the attempt itself
    pub elapsed: Duration,
}

impl AttemptRecord {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, AttemptStatus::Succeeded)
    }
}

/// Result of [`with_retry`]
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// First success, or the last error once the budget is spent
    pub result: Result<T>,
    pub attempts: Vec<AttemptRecord>,
}

impl<T> RetryOutcome<T> {
    pub fn attempts_used(&self) -> u32 {
        self.attempts.len() as u32
    }
}

/// Run `operation` until it succeeds or the policy's attempt budget is spent
///
/// `operation` receives the 1-based attempt number.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let budget = policy.attempt_budget();
    let mut attempts = Vec::with_capacity(budget as usize);
    let mut last_error: Option<AssistError> = None;

    for attempt in 1..=budget {
        let attempt_start = Instant::now();

        match operation(attempt).await {
            Ok(value) => {
                attempts.push(AttemptRecord {
                    attempt,
                    status: AttemptStatus::Succeeded,
                    backoff: None,
                    elapsed: attempt_start.elapsed(),
                });
                debug!(attempt, budget, "Attempt succeeded");
                return RetryOutcome {
                    result: Ok(value),
                    attempts,
                };
            }
            Err(err) => {
                let category = err.category();
                let backoff = (attempt < budget).then(|| policy.jittered_delay_for(attempt - 1));

                warn!(
                    attempt,
                    budget,
                    category = %category,
                    error = %err,
                    backoff_ms = backoff.map(|d| d.as_millis() as u64),
                    "Attempt failed"
                );

                attempts.push(AttemptRecord {
                    attempt,
                    status: AttemptStatus::Failed {
                        category,
                        message: err.to_string(),
                    },
                    backoff,
                    elapsed: attempt_start.elapsed(),
                });
                last_error = Some(err);

                if let Some(delay) = backoff {
                    sleep(delay).await;
                }
            }
        }
    }

    let error = last_error.unwrap_or_else(|| {
        LlmError::new(ErrorCategory::Unknown, "retry loop made no attempts").into()
    });

    RetryOutcome {
        result: Err(error),
        attempts,
    }
}
