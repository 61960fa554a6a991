//! Debug logging of items as they flow through a [`Pipe`].

use crate::node::{BoxCursor, Cursor};
use crate::pipeline::Pipe;
use crate::stats::RunStats;
use anyhow::Result;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

pub(crate) struct InspectOp<T> {
    upstream: BoxCursor<T>,
    label: Arc<str>,
    seen: u64,
}

impl<T: Debug> Cursor for InspectOp<T> {
    type Item = T;

    fn pull(&mut self, stats: &mut RunStats) -> Result<Option<T>> {
        let next = self.upstream.pull(stats)?;
        match &next {
            Some(item) => {
                debug!(label = %self.label, index = self.seen, ?item, "inspect");
                self.seen += 1;
            }
            None => debug!(label = %self.label, count = self.seen, "inspect: exhausted"),
        }
        Ok(next)
    }
}

impl<T: Debug + 'static> Pipe<T> {
    /// Log each item at `debug` level under `label`, passing it through unchanged.
    ///
    /// Nothing is printed unless a `tracing` subscriber is installed.
    #[must_use]
    pub fn inspect(self, label: impl Into<String>) -> Self {
        let label: Arc<str> = Arc::from(label.into());
        self.chain_with(format!("inspect({label})"), move |upstream| InspectOp {
            upstream,
            label: Arc::clone(&label),
            seen: 0,
        })
    }
}
