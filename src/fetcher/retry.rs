//! Retry schedule for page fetches.

use std::time::Duration;

use super::FetchError;

/// Bounded attempts with exponential backoff clamped to a window.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(6),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            min_backoff,
            max_backoff,
        }
    }

    /// Backoff to sleep after the given 1-based attempt failed. Doubles
    /// per attempt, clamped to the policy window.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(10);
        let delay = self.min_backoff.saturating_mul(2u32.pow(exponent));
        delay.clamp(self.min_backoff, self.max_backoff)
    }

    /// Whether the error is worth another attempt at this point in the
    /// schedule. Non-transient errors are never retried.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_attempts && error.is_transient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn backoff_doubles_then_clamps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        // 8s raw, clamped to the 6s ceiling.
        assert_eq!(policy.backoff(3), Duration::from_secs(6));
        assert_eq!(policy.backoff(10), Duration::from_secs(6));
    }

    #[test]
    fn backoff_never_drops_below_floor() {
        let policy = RetryPolicy::new(5, Duration::from_secs(3), Duration::from_secs(3));
        assert_eq!(policy.backoff(1), Duration::from_secs(3));
        assert_eq!(policy.backoff(4), Duration::from_secs(3));
    }

    #[test]
    fn retries_transient_errors_until_budget() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&FetchError::Blocked, 1));
        assert!(policy.should_retry(&FetchError::Blocked, 2));
        assert!(!policy.should_retry(&FetchError::Blocked, 3));
    }

    #[test]
    fn never_retries_exhausted_errors() {
        let policy = RetryPolicy::default();
        let exhausted = FetchError::RetriesExhausted {
            url: "https://www.fiverr.com/search/gigs?query=logo".to_string(),
            attempts: 3,
            last_error: "navigation failed: timeout".to_string(),
        };
        assert!(!policy.should_retry(&exhausted, 1));
    }
}
