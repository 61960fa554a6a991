use crate::node::{BoxCursor, Cursor};
use crate::pipeline::Pipe;
use crate::stats::RunStats;
use anyhow::Result;
use std::sync::Arc;

// ---- Element-wise cursors ----
pub(crate) struct MapOp<T, F> {
    upstream: BoxCursor<T>,
    f: Arc<F>,
}
impl<T, O, F> Cursor for MapOp<T, F>
where
    F: Fn(T) -> O,
{
    type Item = O;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<O>> {
        Ok(self.upstream.pull(stats)?.map(|item| (*self.f)(item)))
    }
}

pub(crate) struct FlatMapOp<T, I: IntoIterator, F> {
    upstream: BoxCursor<T>,
    f: Arc<F>,
    current: Option<I::IntoIter>,
}
impl<T, I, F> Cursor for FlatMapOp<T, I, F>
where
    I: IntoIterator,
    F: Fn(T) -> I,
{
    type Item = I::Item;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<I::Item>> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(out) = inner.next() {
                    return Ok(Some(out));
                }
                self.current = None;
            }
            match self.upstream.pull(stats)? {
                Some(item) => self.current = Some((*self.f)(item).into_iter()),
                None => return Ok(None),
            }
        }
    }
}

pub(crate) struct FilterOp<T, P> {
    upstream: BoxCursor<T>,
    pred: Arc<P>,
}
impl<T, P> Cursor for FilterOp<T, P>
where
    P: Fn(&T) -> bool,
{
    type Item = T;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<T>> {
        while let Some(item) = self.upstream.pull(stats)? {
            if (*self.pred)(&item) {
                return Ok(Some(item));
            }
            stats.dropped += 1;
        }
        Ok(None)
    }
}

pub(crate) struct TapOp<T, F> {
    upstream: BoxCursor<T>,
    f: Arc<F>,
}
impl<T, F> Cursor for TapOp<T, F>
where
    F: Fn(&T),
{
    type Item = T;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<T>> {
        let next = self.upstream.pull(stats)?;
        if let Some(item) = &next {
            (*self.f)(item);
        }
        Ok(next)
    }
}

impl<T: 'static> Pipe<T> {
    /// Emit `f(item)` for every item, in order.
    ///
    /// # Example
    /// ```
    /// use simplypipe::*;
    ///
    /// let out = pipe(vec![1, 2, 3]).map(|x: i32| x * 10).collect().unwrap();
    /// assert_eq!(out, vec![10, 20, 30]);
    /// ```
    #[must_use]
    pub fn map<O, F>(self, f: F) -> Pipe<O>
    where
        O: 'static,
        F: Fn(T) -> O + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.chain_with("map", move |upstream| MapOp {
            upstream,
            f: Arc::clone(&f),
        })
    }

    /// Emit every element of `f(item)`, then move on to the next item.
    ///
    /// An empty result contributes nothing for that item.
    #[must_use]
    pub fn flat_map<I, F>(self, f: F) -> Pipe<I::Item>
    where
        I: IntoIterator + 'static,
        I::IntoIter: 'static,
        I::Item: 'static,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.chain_with("flat_map", move |upstream| FlatMapOp::<T, I, F> {
            upstream,
            f: Arc::clone(&f),
            current: None,
        })
    }

    /// Keep items matching `pred`; every other item counts as `dropped`.
    #[must_use]
    pub fn filter<P>(self, pred: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        self.chain_with("filter", move |upstream| FilterOp {
            upstream,
            pred: Arc::clone(&pred),
        })
    }

    /// Call `f` on each item for its side effect and pass the item on unchanged.
    #[must_use]
    pub fn tap<F>(self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.chain_with("tap", move |upstream| TapOp {
            upstream,
            f: Arc::clone(&f),
        })
    }
}
