//! Attempt Timeouts
//!
//! Bounds a single asynchronous operation so that no generation attempt can
//! hang the retry loop, whatever transport is plugged in.

use std::future::Future;
use std::time::Duration;

use crate::types::{AssistError, Result};

/// Execute an async operation with a timeout
///
/// Returns [`AssistError::Timeout`] if the operation doesn't complete within
/// `timeout`. The timed-out future is dropped.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(AssistError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, AssistError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, AssistError>(42)
            },
            "slow operation",
        )
        .await;
        assert!(matches!(result.unwrap_err(), AssistError::Timeout { .. }));
    }
}
