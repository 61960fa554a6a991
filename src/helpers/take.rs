use crate::node::{BoxCursor, Cursor};
use crate::pipeline::Pipe;
use crate::stats::RunStats;
use anyhow::Result;

pub(crate) struct TakeOp<T> {
    upstream: BoxCursor<T>,
    remaining: usize,
}

impl<T> Cursor for TakeOp<T> {
    type Item = T;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<T>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let next = self.upstream.pull(stats)?;
        match next {
            Some(_) => self.remaining -= 1,
            None => self.remaining = 0,
        }
        Ok(next)
    }
}

impl<T: 'static> Pipe<T> {
    /// Emit at most the first `n` items, then stop pulling upstream.
    ///
    /// Upstream operators (and the source) see exactly `min(n, N)` pulls that
    /// produce an item, which makes `take` the way to bound an infinite source.
    ///
    /// # Example
    /// ```
    /// use simplypipe::*;
    ///
    /// let out = pipe(0u64..).map(|x| x * x).take(4).collect().unwrap();
    /// assert_eq!(out, vec![0, 1, 4, 9]);
    /// ```
    #[must_use]
    pub fn take(self, n: usize) -> Self {
        self.chain_with(format!("take({n})"), move |upstream| TakeOp {
            upstream,
            remaining: n,
        })
    }
}
