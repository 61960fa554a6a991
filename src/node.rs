//! Pull-based cursors: the unit every operator compiles down to.
//!
//! A [`Cursor`] produces one item per [`pull`](Cursor::pull), or `None` once it
//! is exhausted. Operators wrap an upstream cursor and pull from it lazily, so a
//! whole pipeline is a stack of cursors with the counting [`SourceCursor`] at
//! the bottom. The run's [`RunStats`] is passed down by `&mut` on every pull,
//! which keeps a single owner for the record without any shared-state cells.

use crate::stats::RunStats;
use anyhow::Result;

/// Lazy, fallible sequence that shares a stats record with its upstream.
pub trait Cursor {
    type Item;

    /// Produce the next item, `Ok(None)` on exhaustion.
    ///
    /// An `Err` is fatal for the run: the engine stops pulling and returns it.
    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<Self::Item>>;
}

/// Type-erased cursor as stored between stages.
pub type BoxCursor<T> = Box<dyn Cursor<Item = T>>;

/// Bottom of every chain: adapts a plain iterator and counts `processed`.
pub(crate) struct SourceCursor<I> {
    iter: I,
}

impl<I: Iterator> SourceCursor<I> {
    pub(crate) const fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: Iterator> Cursor for SourceCursor<I> {
    type Item = I::Item;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<I::Item>> {
        let next = self.iter.next();
        if next.is_some() {
            stats.processed += 1;
        }
        Ok(next)
    }
}
