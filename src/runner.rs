//! Execution engine.
//!
//! A run builds a fresh cursor chain from the pipeline's plan (which also
//! validates every operator's configuration), pulls it to exhaustion, hands
//! each item to the sink, and returns the [`RunStats`] gathered on the way.
//!
//! Errors end the run immediately and are returned as-is; no stats are
//! produced for a failed run. Side effects already performed by taps or the
//! sink are not rolled back.

use crate::pipeline::Pipe;
use crate::stats::RunStats;
use anyhow::Result;
use std::time::Instant;
use tracing::{debug, info_span, warn};

/// Execution settings for a pipeline run.
#[derive(Clone, Debug, Default)]
pub struct Runner {
    /// Name recorded on the run's tracing span.
    pub name: Option<String>,
}

impl Runner {
    /// Create an unnamed runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the run in log output.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run `pipe`, passing every emitted item to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: a misconfigured operator, a failure not
    /// trapped by `retry_map`/`catch`, exhausted retries, or an error from `sink`.
    pub fn run<T, S>(&self, pipe: &Pipe<T>, mut sink: S) -> Result<RunStats>
    where
        T: 'static,
        S: FnMut(T) -> Result<()>,
    {
        let span = info_span!("pipe_run", name = self.name.as_deref().unwrap_or("pipe"));
        let _guard = span.enter();

        let mut stats = RunStats::new();
        debug!(stages = ?pipe.stages(), "starting run");

        let start = Instant::now();
        let outcome = Self::drain(pipe, &mut stats, &mut sink);
        if let Err(e) = &outcome {
            warn!(error = %e, processed = stats.processed, emitted = stats.emitted, "run aborted");
        }
        outcome?;
        stats.duration = start.elapsed();

        debug!(%stats, "run finished");
        Ok(stats)
    }

    fn drain<T, S>(pipe: &Pipe<T>, stats: &mut RunStats, sink: &mut S) -> Result<()>
    where
        T: 'static,
        S: FnMut(T) -> Result<()>,
    {
        let mut cursor = pipe.build()?;
        while let Some(item) = cursor.pull(stats)? {
            stats.emitted += 1;
            sink(item)?;
        }
        Ok(())
    }
}

impl<T: 'static> Pipe<T> {
    /// Run the pipeline, discarding its output.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub fn run(&self) -> Result<RunStats> {
        self.run_with(|_| {})
    }

    /// Run the pipeline, calling `sink` once per emitted item.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub fn run_with<S>(&self, mut sink: S) -> Result<RunStats>
    where
        S: FnMut(T),
    {
        self.try_run_with(|item| {
            sink(item);
            Ok(())
        })
    }

    /// Run the pipeline with a fallible sink; a sink error aborts the run.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub fn try_run_with<S>(&self, sink: S) -> Result<RunStats>
    where
        S: FnMut(T) -> Result<()>,
    {
        Runner::new().run(self, sink)
    }

    /// Run the pipeline and gather its output.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub fn collect(&self) -> Result<Vec<T>> {
        self.collect_with_stats().map(|(out, _)| out)
    }

    /// Run the pipeline and gather its output together with the run's stats.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub fn collect_with_stats(&self) -> Result<(Vec<T>, RunStats)> {
        let mut out = Vec::new();
        let stats = self.run_with(|item| out.push(item))?;
        Ok((out, stats))
    }
}
