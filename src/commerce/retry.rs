//! Retry policy for commerce API calls.

use std::time::Duration;

/// Bounded retry with capped exponential backoff.
///
/// Every request additionally carries `request_timeout`; a request that
/// exceeds it counts as a transport failure and is eligible for retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Upper bound on the inter-attempt delay.
    pub max_delay: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after a failed attempt (1-based); doubles each time,
    /// capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_until_cap() {
        let policy = RetryPolicy::default();

        let first = policy.delay_for_attempt(1);
        let second = policy.delay_for_attempt(2);
        let third = policy.delay_for_attempt(3);

        assert_eq!(first, Duration::from_millis(250));
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(30), policy.max_delay);
    }

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.request_timeout, Duration::from_secs(10));
    }
}
