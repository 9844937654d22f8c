//! Retry policy for transport failures.
//!
//! Only transport-level failures are retried:
//! - Timeouts
//! - Connection failures (refused, reset, DNS)
//! - Errors while reading the response body
//!
//! A response that arrived is never retried, whatever its status code or
//! payload. The delay grows linearly with the attempt number.

use std::time::Duration;

/// Default retry configuration
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_BACKOFF_SECS: u64 = 2;

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Multiplied by the attempt number to get the delay after that attempt
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_secs(DEFAULT_BASE_BACKOFF_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            max_attempts,
            base_backoff,
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(attempt)
    }

    /// Sleeps between attempts for a call that fails every time.
    ///
    /// There is no sleep after the final attempt, so a policy of `n` attempts
    /// yields `n - 1` delays.
    pub fn schedule(&self, max_attempts: u32) -> Vec<Duration> {
        (1..max_attempts.max(1))
            .map(|attempt| self.delay_for_attempt(attempt))
            .collect()
    }
}

/// Why a transport-level request failed, for logs
pub fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_body() || error.is_decode() {
        format!("failed to read response body: {}", error)
    } else if error.is_redirect() {
        format!("redirect policy violated: {}", error)
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_backoff, Duration::from_secs(2));
    }

    #[test]
    fn test_delay_is_linear() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(6));
    }

    #[test]
    fn test_schedule_has_no_trailing_sleep() {
        let policy = RetryPolicy::default();

        assert_eq!(
            policy.schedule(3),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
        assert!(policy.schedule(1).is_empty());
        assert!(policy.schedule(0).is_empty());
    }

    #[test]
    fn test_custom_base() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(1000));
        assert_eq!(policy.schedule(policy.max_attempts).len(), 4);
    }
}
