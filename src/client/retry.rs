//! Retry decisions and backoff timing.

use super::utils::exponential_backoff;
use crate::error::ApiError;
use crate::ClientConfig;
use std::time::Duration;

/// Exponential backoff with a ceiling.
///
/// Only network failures, timeouts, rate limiting, and server errors are retried; the
/// attempt index passed to [`backoff_delay`](Self::backoff_delay) is `0` for the first
/// retry.
///
/// # Examples
///
/// ```
/// use invoice_api::client::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.backoff_delay(0), Duration::from_millis(250));
/// assert_eq!(policy.backoff_delay(2), Duration::from_millis(1000));
/// assert_eq!(policy.backoff_delay(10), Duration::from_millis(3000));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    base: Duration,
    ceiling: Duration,
}

impl RetryPolicy {
    /// Policy with the given first delay and upper bound.
    pub fn new(base: Duration, ceiling: Duration) -> Self {
        RetryPolicy { base, ceiling }
    }

    /// Policy built from the backoff settings of a client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        RetryPolicy::new(
            Duration::from_millis(config.backoff_base_ms),
            Duration::from_millis(config.backoff_ceiling_ms),
        )
    }

    /// Whether the failure category allows another attempt.
    pub fn should_retry(&self, error: &ApiError) -> bool {
        error.is_retryable()
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        exponential_backoff(attempt, self.base, self.ceiling)
    }

    /// Delay before the next attempt, or `None` when `error` must be raised.
    ///
    /// `attempt` is the 0-based index of the attempt that just failed.
    pub fn next_delay(&self, error: &ApiError, attempt: u32, max_retries: u32) -> Option<Duration> {
        (attempt < max_retries && self.should_retry(error)).then(|| self.backoff_delay(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from_config(&ClientConfig::default())
    }
}
