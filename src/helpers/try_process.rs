//! Fallible transforms: fail-fast, retried, and trapped.
//!
//! User functions return [`anyhow::Result`]. Which failures are recoverable is
//! decided by an [`ErrorFilter`]; a failure outside the filter is returned from
//! the run unchanged, so callers can still `downcast_ref` it.

use crate::error_filter::ErrorFilter;
use crate::node::{BoxCursor, Cursor};
use crate::pipeline::Pipe;
use crate::retry::RetryPolicy;
use crate::stats::RunStats;
use anyhow::Result;
use std::sync::Arc;
use std::thread;
use tracing::warn;

pub(crate) struct TryMapOp<T, F> {
    upstream: BoxCursor<T>,
    f: Arc<F>,
}

impl<T, O, F> Cursor for TryMapOp<T, F>
where
    F: Fn(T) -> Result<O>,
{
    type Item = O;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<O>> {
        self.upstream
            .pull(stats)?
            .map(|item| (*self.f)(item))
            .transpose()
    }
}

pub(crate) struct RetryMapOp<T, F> {
    upstream: BoxCursor<T>,
    f: Arc<F>,
    policy: RetryPolicy,
}

impl<T, O, F> Cursor for RetryMapOp<T, F>
where
    F: Fn(&T) -> Result<O>,
{
    type Item = O;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<O>> {
        let Some(item) = self.upstream.pull(stats)? else {
            return Ok(None);
        };
        let mut attempt = 0u32;
        loop {
            match (*self.f)(&item) {
                Ok(out) => return Ok(Some(out)),
                Err(e) if self.policy.filter.matches(&e) => {
                    stats.errors += 1;
                    if attempt >= self.policy.retries {
                        warn!(attempts = attempt + 1, error = %e, "retries exhausted");
                        return Err(e);
                    }
                    let delay = self.policy.backoff_for(attempt);
                    warn!(attempt, ?delay, error = %e, "retrying item");
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub(crate) struct CatchOp<T, F, H> {
    upstream: BoxCursor<T>,
    f: Arc<F>,
    on_error: Arc<H>,
    filter: ErrorFilter,
}

impl<T, O, F, H> Cursor for CatchOp<T, F, H>
where
    F: Fn(&T) -> Result<O>,
    H: Fn(&T, &anyhow::Error),
{
    type Item = O;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<O>> {
        while let Some(item) = self.upstream.pull(stats)? {
            match (*self.f)(&item) {
                Ok(out) => return Ok(Some(out)),
                Err(e) if self.filter.matches(&e) => {
                    stats.errors += 1;
                    warn!(error = %e, "item failed, skipping");
                    (*self.on_error)(&item, &e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}

impl<T: 'static> Pipe<T> {
    /// Apply a fallible function; the first error aborts the run.
    #[must_use]
    pub fn try_map<O, F>(self, f: F) -> Pipe<O>
    where
        O: 'static,
        F: Fn(T) -> Result<O> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.chain_with("try_map", move |upstream| TryMapOp {
            upstream,
            f: Arc::clone(&f),
        })
    }

    /// Apply `f`, retrying failures with the default [`RetryPolicy`]
    /// (3 retries, 1s exponential backoff, any error).
    #[must_use]
    pub fn retry_map<O, F>(self, f: F) -> Pipe<O>
    where
        O: 'static,
        F: Fn(&T) -> Result<O> + Send + Sync + 'static,
    {
        self.retry_map_with(f, RetryPolicy::default())
    }

    /// Apply `f`, retrying failures accepted by `policy.filter`.
    ///
    /// Each accepted failure counts in `errors`. After `policy.retries + 1`
    /// failed attempts the last error ends the run; an error the filter rejects
    /// ends it immediately and is not counted.
    ///
    /// # Example
    /// ```
    /// use simplypipe::*;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let calls = Arc::new(AtomicU32::new(0));
    /// let c = Arc::clone(&calls);
    /// let flaky = move |x: &i32| {
    ///     if c.fetch_add(1, Ordering::SeqCst) < 2 {
    ///         anyhow::bail!("not yet");
    ///     }
    ///     Ok(x * 10)
    /// };
    ///
    /// let policy = RetryPolicy::new().with_retries(3).with_backoff(Duration::ZERO);
    /// let mut out = Vec::new();
    /// let stats = pipe(vec![1]).retry_map_with(flaky, policy).run_with(|x| out.push(x)).unwrap();
    /// assert_eq!(out, vec![10]);
    /// assert_eq!(stats.errors, 2);
    /// ```
    #[must_use]
    pub fn retry_map_with<O, F>(self, f: F, policy: RetryPolicy) -> Pipe<O>
    where
        O: 'static,
        F: Fn(&T) -> Result<O> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let label = format!("retry_map(retries={}, backoff={:?})", policy.retries, policy.backoff);
        self.chain_with(label, move |upstream| RetryMapOp {
            upstream,
            f: Arc::clone(&f),
            policy: policy.clone(),
        })
    }

    /// Apply `f`, trapping every failure.
    ///
    /// Failed items are dropped from the output, counted in `errors`, and
    /// reported once to `on_error(item, err)`.
    #[must_use]
    pub fn catch<O, F, H>(self, f: F, on_error: H) -> Pipe<O>
    where
        O: 'static,
        F: Fn(&T) -> Result<O> + Send + Sync + 'static,
        H: Fn(&T, &anyhow::Error) + Send + Sync + 'static,
    {
        self.catch_only(f, on_error, ErrorFilter::any())
    }

    /// Like [`catch`](Self::catch), but only traps failures accepted by `filter`.
    ///
    /// Any other failure ends the run.
    #[must_use]
    pub fn catch_only<O, F, H>(self, f: F, on_error: H, filter: ErrorFilter) -> Pipe<O>
    where
        O: 'static,
        F: Fn(&T) -> Result<O> + Send + Sync + 'static,
        H: Fn(&T, &anyhow::Error) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let on_error = Arc::new(on_error);
        self.chain_with("catch", move |upstream| CatchOp {
            upstream,
            f: Arc::clone(&f),
            on_error: Arc::clone(&on_error),
            filter: filter.clone(),
        })
    }
}
