//! Utility functions for the API client.
//!
//! This module provides helper functions for:
//! - Status code classification
//! - Exponential backoff calculation
//! - Success-range checks

use std::time::Duration;

/// Check if status code indicates a retryable failure.
///
/// `0` (no response), `408`, `429`, and every `5xx` qualify.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 0 | 408 | 429) || status >= 500
}

/// Check if status code is in the `2xx` range
#[inline]
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Exponential backoff delay calculation
///
/// Returns `min(ceiling, base * 2^attempt)`; overflow saturates to the ceiling.
pub fn exponential_backoff(attempt: u32, base: Duration, ceiling: Duration) -> Duration {
    2u32.checked_pow(attempt)
        .and_then(|factor| base.checked_mul(factor))
        .map_or(ceiling, |delay| delay.min(ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(0));
        assert!(is_retryable_status(408));
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(422));
    }

    #[test]
    fn test_is_success_status() {
        assert!(is_success_status(200));
        assert!(is_success_status(204));
        assert!(!is_success_status(199));
        assert!(!is_success_status(304));
    }

    #[test]
    fn test_exponential_backoff() {
        let base = Duration::from_millis(250);
        let ceiling = Duration::from_millis(3_000);
        assert_eq!(exponential_backoff(0, base, ceiling), Duration::from_millis(250));
        assert_eq!(exponential_backoff(1, base, ceiling), Duration::from_millis(500));
        assert_eq!(exponential_backoff(3, base, ceiling), Duration::from_millis(2_000));
        assert_eq!(exponential_backoff(4, base, ceiling), ceiling);
        assert_eq!(exponential_backoff(40, base, ceiling), ceiling);
    }
}
