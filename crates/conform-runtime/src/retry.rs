//! Retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::providers::ProviderError;

/// How many times a request is attempted and how long to wait between
/// attempts.
///
/// The wait before retry `n` (1-based) is `base_delay * 2^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: usize,

    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: usize, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_factor(2.0)
            .with_max_delay(Duration::from_secs(3600))
            .with_max_times(self.attempts.saturating_sub(1))
    }

    /// Run `operation` until it succeeds, fails permanently, or runs out
    /// of attempts. The last error is returned.
    pub async fn run<T, F, Fut>(&self, what: &str, operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let attempts = self.attempts;
        operation
            .retry(self.backoff())
            .sleep(tokio::time::sleep)
            .when(ProviderError::is_transient)
            .notify(|err: &ProviderError, wait: Duration| {
                tracing::warn!(
                    operation = what,
                    error = %err,
                    wait = ?wait,
                    attempts,
                    "attempt failed, retrying"
                );
            })
            .await
    }
}
