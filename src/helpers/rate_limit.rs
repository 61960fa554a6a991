//! Blocking throughput cap for [`Pipe`].

use crate::node::{BoxCursor, Cursor};
use crate::pipeline::Pipe;
use crate::stats::RunStats;
use anyhow::{Context, Result, bail};
use std::thread;
use std::time::{Duration, Instant};

pub(crate) struct RateLimitOp<T> {
    upstream: BoxCursor<T>,
    min_interval: Duration,
    last_emit: Option<Instant>,
}

impl<T> Cursor for RateLimitOp<T> {
    type Item = T;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<T>> {
        let Some(item) = self.upstream.pull(stats)? else {
            return Ok(None);
        };
        if let Some(last) = self.last_emit {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last_emit = Some(Instant::now());
        Ok(Some(item))
    }
}

/// Minimum spacing between two emissions for `rate` items per `per`.
pub(crate) fn min_interval(rate: f64, per: Duration) -> Result<Duration> {
    if !rate.is_finite() || rate <= 0.0 {
        bail!("rate must be a positive finite number, got {rate}");
    }
    Duration::try_from_secs_f64(per.as_secs_f64() / rate)
        .with_context(|| format!("rate limit interval out of range ({per:?} / {rate})"))
}

impl<T: 'static> Pipe<T> {
    /// Emit at most `rate` items per second.
    ///
    /// Shorthand for [`rate_limit_per`](Self::rate_limit_per) with a one-second
    /// window.
    #[must_use]
    pub fn rate_limit(self, rate: f64) -> Self {
        self.rate_limit_per(rate, Duration::from_secs(1))
    }

    /// Emit at most `rate` items per `per`.
    ///
    /// Items are never dropped or reordered. Before emitting any item after the
    /// first, the run thread sleeps until `per / rate` has passed since the
    /// previous emission. A non-positive or non-finite `rate` is rejected when the
    /// pipeline is run.
    #[must_use]
    pub fn rate_limit_per(self, rate: f64, per: Duration) -> Self {
        self.chain(format!("rate_limit({rate}/{per:?})"), move |upstream| {
            let cursor: BoxCursor<T> = Box::new(RateLimitOp {
                upstream,
                min_interval: min_interval(rate, per)?,
                last_emit: None,
            });
            Ok(cursor)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_per_over_rate() -> Result<()> {
        assert_eq!(min_interval(4.0, Duration::from_secs(1))?, Duration::from_millis(250));
        assert_eq!(min_interval(1.0, Duration::from_secs(2))?, Duration::from_secs(2));
        Ok(())
    }

    #[test]
    fn rejects_bad_rates() {
        assert!(min_interval(0.0, Duration::from_secs(1)).is_err());
        assert!(min_interval(-3.0, Duration::from_secs(1)).is_err());
        assert!(min_interval(f64::NAN, Duration::from_secs(1)).is_err());
        assert!(min_interval(f64::INFINITY, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn rejects_overflowing_interval() {
        assert!(min_interval(f64::MIN_POSITIVE, Duration::from_secs(1)).is_err());
    }
}
