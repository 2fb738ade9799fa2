//! Retry policy for destination writes.
//!
//! Bounded exponential backoff. Only throttling and transient server
//! statuses are retried; everything else surfaces immediately so a
//! misconfigured destination does not eat the retry budget.

use projector_core::config::RetryConfig;
use reqwest::StatusCode;
use std::time::Duration;

/// Retry policy with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempt` completed ones
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Backoff delay before the attempt following `attempt`
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay =
            self.initial_backoff.as_millis() as f64 * self.multiplier.powi(attempt as i32 - 1);
        std::cmp::min(Duration::from_millis(delay as u64), self.max_backoff)
    }

    /// Statuses worth retrying: throttling plus transient server failures
    pub fn is_retryable_status(status: StatusCode) -> bool {
        matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
    }
}
