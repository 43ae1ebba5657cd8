use std::time::Duration;

use crate::config::RetryConfig;
use crate::errors::{EmbeddingError, UpstreamError};

/// Errors a retry wrapper can classify and synthesize on timeout.
pub trait RetryableError: Sized {
    fn is_transient(&self) -> bool;

    /// The error reported when an attempt exceeds its timeout.
    fn timed_out(service: &str, timeout: Duration) -> Self;
}

impl RetryableError for UpstreamError {
    fn is_transient(&self) -> bool {
        UpstreamError::is_transient(self)
    }

    fn timed_out(service: &str, timeout: Duration) -> Self {
        UpstreamError::Timeout {
            service: service.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    }
}

impl RetryableError for EmbeddingError {
    fn is_transient(&self) -> bool {
        EmbeddingError::is_transient(self)
    }

    fn timed_out(_service: &str, timeout: Duration) -> Self {
        EmbeddingError::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    }
}

/// Bounded exponential backoff: `base · 2^(retry-1)`, capped at `max_delay`.
///
/// The policy only computes delays. Sleeping belongs to whichever async
/// wrapper consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based), or `None` when the
    /// attempt budget is spent.
    pub fn delay_for(&self, retry: u32) -> Option<Duration> {
        if retry == 0 || retry >= self.max_attempts {
            return None;
        }
        let factor = 2u32.saturating_pow(retry - 1);
        Some(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for BackoffPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }
}
