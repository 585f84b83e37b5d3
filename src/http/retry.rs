//! Retry policy for HTTP requests.

use crate::error::SdkError;
use std::ops::Range;
use std::time::Duration;

/// Which failures are retried.
///
/// Cancellation and timeouts are never retried regardless of the choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryOn {
    /// Network failures and every HTTP error status, 4xx included.
    /// Assumes all endpoints are idempotent.
    #[default]
    AnyFailure,
    /// Network failures, 408, 429 and 5xx only.
    TransientOnly,
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// The first backoff is drawn uniformly from this window.
    pub initial_backoff_range: Range<Duration>,
    /// Multiplier applied to the backoff after each retry.
    pub backoff_factor: f64,
    pub retry_on: RetryOn,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_range: Duration::from_millis(100)..Duration::from_millis(200),
            backoff_factor: 2.0,
            retry_on: RetryOn::AnyFailure,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, retry_on: RetryOn) -> Self {
        Self {
            max_retries,
            retry_on,
            ..Self::default()
        }
    }

    /// Randomized first backoff so many clients failing together don't
    /// retry in lockstep.
    pub fn initial_backoff(&self) -> Duration {
        let (start, end) = (self.initial_backoff_range.start, self.initial_backoff_range.end);
        if end <= start {
            return start;
        }
        let span = (end - start).as_secs_f64();
        let jitter = Duration::from_secs_f64(rand::random::<f64>() * span);
        (start + jitter).min(end - Duration::from_nanos(1))
    }

    /// Backoff for the retry after one that waited `current`.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff_factor.max(0.0))
    }

    pub fn should_retry(&self, error: &SdkError) -> bool {
        match error {
            SdkError::Aborted { .. } | SdkError::Timeout { .. } => false,
            SdkError::Network { .. } => true,
            SdkError::Api { status, .. } => match self.retry_on {
                RetryOn::AnyFailure => true,
                RetryOn::TransientOnly => {
                    matches!(*status, 408 | 429) || (500..600).contains(status)
                }
            },
            _ => false,
        }
    }
}
