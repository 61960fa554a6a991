//! Retry configuration for [`Pipe::retry_map_with`](crate::Pipe::retry_map_with).
//!
//! Backoff is exponential: the wait after failed attempt `n` (zero-based) is
//! `backoff * 2^n`. A zero backoff retries immediately.

use crate::error_filter::ErrorFilter;
use std::time::Duration;

/// How many times to retry an item, how long to wait, and which errors count.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub retries: u32,
    /// Base wait before the first retry.
    pub backoff: Duration,
    /// Errors that are retried; everything else is fatal.
    pub filter: ErrorFilter,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: Duration::from_secs(1),
            filter: ErrorFilter::any(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the defaults: 3 retries, 1s backoff, any error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retries.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the base backoff.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Restrict retries to errors accepted by `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: ErrorFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Total attempts per item.
    #[must_use]
    pub const fn max_attempts(&self) -> u64 {
        self.retries as u64 + 1
    }

    /// Wait after failed attempt `attempt`, saturating at `Duration::MAX`.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.backoff.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }
}
