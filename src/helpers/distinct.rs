//! Streaming duplicate suppression for [`Pipe`].
//!
//! # Overview
//! - [`Pipe::dedupe`] - drop repeats of an item (exact, unbounded memory)
//! - [`Pipe::dedupe_by`] - drop repeats of a derived key
//! - [`Pipe::dedupe_within`] / [`Pipe::dedupe_by_within`] - same, but only the
//!   most recently inserted `max_size` keys are remembered
//!
//! The bounded variants trade exactness for memory: once a key is evicted it
//! can be emitted again. Keys are evicted in insertion order; seeing a
//! duplicate does not refresh it.

use crate::node::{BoxCursor, Cursor};
use crate::pipeline::Pipe;
use crate::stats::RunStats;
use anyhow::Result;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

/// Insertion-ordered set of keys with optional capacity.
pub(crate) struct SeenWindow<K> {
    order: VecDeque<K>,
    members: HashSet<K>,
    max_size: Option<usize>,
}

impl<K: Eq + Hash + Clone> SeenWindow<K> {
    pub(crate) fn new(max_size: Option<usize>) -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
            max_size,
        }
    }

    /// Record `key`; returns false if it was already present.
    ///
    /// The key is inserted first and the oldest key evicted afterwards if the
    /// window grew past `max_size`.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        if self.members.contains(&key) {
            return false;
        }
        if self.max_size.is_some() {
            self.order.push_back(key.clone());
        }
        self.members.insert(key);
        if let Some(max) = self.max_size {
            while self.members.len() > max {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.members.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }
}

pub(crate) struct DedupeOp<T, K, F> {
    upstream: BoxCursor<T>,
    key: Arc<F>,
    seen: SeenWindow<K>,
}

impl<T, K, F> Cursor for DedupeOp<T, K, F>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    type Item = T;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<T>> {
        while let Some(item) = self.upstream.pull(stats)? {
            if self.seen.insert((*self.key)(&item)) {
                return Ok(Some(item));
            }
            stats.dropped += 1;
        }
        Ok(None)
    }
}

impl<T: 'static> Pipe<T> {
    /// Emit only the first occurrence of each distinct item.
    ///
    /// # Example
    /// ```
    /// use simplypipe::*;
    ///
    /// let out = pipe(vec![3, 1, 2, 1, 3]).dedupe().collect().unwrap();
    /// assert_eq!(out, vec![3, 1, 2]);
    /// ```
    #[must_use]
    pub fn dedupe(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.dedupe_impl("dedupe".to_string(), T::clone, None)
    }

    /// Emit only the first item for each distinct `key(item)`.
    #[must_use]
    pub fn dedupe_by<K, F>(self, key: F) -> Self
    where
        K: Eq + Hash + Clone + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.dedupe_impl("dedupe(key)".to_string(), key, None)
    }

    /// Like [`dedupe`](Self::dedupe), remembering at most `max_size` items.
    ///
    /// With `max_size = 2`, the input `[1, 2, 3, 1]` emits all four items: `3`
    /// evicts `1`, so the final `1` is new again. A `max_size` of zero
    /// remembers nothing and lets every item through.
    #[must_use]
    pub fn dedupe_within(self, max_size: usize) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.dedupe_impl(format!("dedupe(max_size={max_size})"), T::clone, Some(max_size))
    }

    /// Like [`dedupe_by`](Self::dedupe_by), remembering at most `max_size` keys.
    #[must_use]
    pub fn dedupe_by_within<K, F>(self, key: F, max_size: usize) -> Self
    where
        K: Eq + Hash + Clone + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.dedupe_impl(format!("dedupe(key, max_size={max_size})"), key, Some(max_size))
    }

    fn dedupe_impl<K, F>(self, label: String, key: F, max_size: Option<usize>) -> Self
    where
        K: Eq + Hash + Clone + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let key = Arc::new(key);
        self.chain_with(label, move |upstream| DedupeOp {
            upstream,
            key: Arc::clone(&key),
            seen: SeenWindow::new(max_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_window_remembers_everything() {
        let mut w = SeenWindow::new(None);
        assert!(w.insert(1));
        assert!(w.insert(2));
        assert!(!w.insert(1));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn bounded_window_evicts_oldest_insert() {
        let mut w = SeenWindow::new(Some(2));
        assert!(w.insert(1));
        assert!(w.insert(2));
        assert!(!w.insert(1));
        assert!(w.insert(3));
        assert_eq!(w.len(), 2);
        // 1 was the oldest insert, even though it was seen again after 2.
        assert!(w.insert(1));
        assert!(!w.insert(3));
    }

    #[test]
    fn zero_capacity_forgets_immediately() {
        let mut w = SeenWindow::new(Some(0));
        assert!(w.insert("a"));
        assert!(w.insert("a"));
        assert_eq!(w.len(), 0);
    }
}
