//! Fixed-size grouping for [`Pipe`].
//!
//! [`Pipe::batch`] turns a stream of `T` into a stream of `Vec<T>` so
//! downstream stages can amortize per-call costs (bulk inserts, batched API
//! requests, vectorized work) while the overall run stays lazy: a group is
//! emitted as soon as it fills, not after the source is exhausted.

use crate::node::{BoxCursor, Cursor};
use crate::pipeline::Pipe;
use crate::stats::RunStats;
use anyhow::{Result, bail};

/// Upper bound on the up-front reservation for one group; larger groups grow on demand.
const MAX_PREALLOC: usize = 1024;

pub(crate) struct BatchOp<T> {
    upstream: BoxCursor<T>,
    size: usize,
    exhausted: bool,
}

impl<T> Cursor for BatchOp<T> {
    type Item = Vec<T>;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<Vec<T>>> {
        if self.exhausted {
            return Ok(None);
        }
        let mut group = Vec::with_capacity(self.size.min(MAX_PREALLOC));
        while group.len() < self.size {
            match self.upstream.pull(stats)? {
                Some(item) => group.push(item),
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }
        if group.is_empty() {
            return Ok(None);
        }
        stats.batches += 1;
        Ok(Some(group))
    }
}

impl<T: 'static> Pipe<T> {
    /// Group items into vectors of `size`.
    ///
    /// Full groups are emitted as soon as they fill; a trailing partial group is
    /// emitted when the input runs out. `N` items therefore produce
    /// `ceil(N / size)` groups, each counted in `batches`.
    ///
    /// A `size` of zero is rejected when the pipeline is run, before any item is
    /// pulled.
    ///
    /// # Example
    /// ```
    /// use simplypipe::*;
    ///
    /// let groups = pipe(0..7).batch(3).collect().unwrap();
    /// assert_eq!(groups, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    /// ```
    #[must_use]
    pub fn batch(self, size: usize) -> Pipe<Vec<T>> {
        self.chain(format!("batch({size})"), move |upstream| {
            if size == 0 {
                bail!("batch size must be positive, got 0");
            }
            let cursor: BoxCursor<Vec<T>> = Box::new(BatchOp {
                upstream,
                size,
                exhausted: false,
            });
            Ok(cursor)
        })
    }
}
