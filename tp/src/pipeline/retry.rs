//! Exponential backoff for rate-limited conversations

use std::time::Duration;

use crate::config::PlannerConfig;

/// How rate-limited attempts are retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Backoff unit; attempt n (0-based) sleeps `base_delay * 2^n`
    pub base_delay: Duration,
    /// Sleep at least the provider's retry-after hint when one is given
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            respect_retry_after: false,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.backoff_ms),
            respect_retry_after: config.respect_retry_after,
        }
    }

    /// Pure exponential backoff for a 0-based attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Delay after a rate-limited attempt, honoring the hint if configured
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff(attempt);
        match retry_after {
            Some(hint) if self.respect_retry_after => backoff.max(hint),
            _ => backoff,
        }
    }

    /// Sum of every backoff sleep when all attempts are rate limited
    pub fn worst_case_delay(&self) -> Duration {
        (0..self.max_attempts).fold(Duration::ZERO, |total, attempt| total.saturating_add(self.backoff(attempt)))
    }
}
