use std::time::Duration;

/// Delay before retry number `retry_count` (0-indexed): `base * 2^retry_count`, saturating.
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(retry_count))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay:  Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay:  Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay:  Duration::ZERO,
        }
    }

    pub fn new(max_retries: u32, base_delay: Duration) -> Self { Self { max_retries, base_delay } }

    pub fn max_attempts(&self) -> u32 { self.max_retries.saturating_add(1) }

    pub fn delay(&self, retry_count: u32) -> Duration { retry_delay(retry_count, self.base_delay) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles() {
        let base = Duration::from_millis(100);
        assert_eq!(retry_delay(0, base), Duration::from_millis(100));
        assert_eq!(retry_delay(1, base), Duration::from_millis(200));
        assert_eq!(retry_delay(3, base), Duration::from_millis(800));
    }

    #[test]
    fn test_retry_delay_saturates() {
        let delay = retry_delay(40, Duration::from_secs(u64::MAX / 2));
        assert!(delay > Duration::ZERO);
    }

    #[test]
    fn test_policy_attempts() {
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
        assert_eq!(RetryPolicy::default().max_attempts(), 3);
        assert_eq!(RetryPolicy::default().delay(1), Duration::from_secs(1));
    }
}
