//! # simplypipe
//!
//! A **lazy, composable data pipeline builder**. Attach a chain of stages to a
//! source of items; nothing happens until the pipeline is run, and each run
//! returns a [`RunStats`] summary.
//!
//! ## Key Features
//!
//! - **Lazy builders** - operator methods only record work; [`Pipe::run`] does it
//! - **Pull-based execution** - one item at a time, so infinite sources work with [`take`](Pipe::take)
//! - **Element-wise stages** - map, flat_map, filter, tap
//! - **Stateful stages** - batch, dedupe (exact or bounded), rate_limit, take
//! - **Failure policy** - retry with exponential backoff, catch-and-skip, fail-fast
//! - **Run accounting** - processed/emitted/dropped/batches/errors counters and timing
//!
//! ## Quick Start
//!
//! ```
//! use simplypipe::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let mut out = Vec::new();
//! let stats = pipe(vec!["a", "b", "a", "c", "d"])
//!     .dedupe()
//!     .map(|s: &str| s.to_uppercase())
//!     .batch(2)
//!     .run_with(|group| out.push(group))?;
//!
//! assert_eq!(out, vec![vec!["A", "B"], vec!["C", "D"]]);
//! assert_eq!(stats.processed, 5);
//! assert_eq!(stats.dropped, 1);
//! assert_eq!(stats.batches, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Pipe
//!
//! A [`Pipe<T>`] is an immutable handle on a source plus a list of pending
//! operators that yield items of type `T`. Each operator method returns a new
//! `Pipe`; clone one to branch. A `Pipe` can be run any number of times, and
//! every run re-creates the source iterator, so the source must be re-iterable
//! (see [`pipe`] and [`from_fn`]).
//!
//! ### Operators
//!
//! - [`map`](Pipe::map), [`flat_map`](Pipe::flat_map), [`filter`](Pipe::filter), [`tap`](Pipe::tap)
//! - [`batch`](Pipe::batch) - fixed-size `Vec<T>` groups
//! - [`dedupe`](Pipe::dedupe), [`dedupe_by`](Pipe::dedupe_by),
//!   [`dedupe_within`](Pipe::dedupe_within), [`dedupe_by_within`](Pipe::dedupe_by_within)
//! - [`rate_limit`](Pipe::rate_limit), [`rate_limit_per`](Pipe::rate_limit_per) - blocking throttle
//! - [`take`](Pipe::take) - stop after `n` items
//! - [`try_map`](Pipe::try_map), [`retry_map`](Pipe::retry_map),
//!   [`retry_map_with`](Pipe::retry_map_with), [`catch`](Pipe::catch),
//!   [`catch_only`](Pipe::catch_only) - fallible transforms
//! - [`inspect`](Pipe::inspect) - `tracing` debug output per item
//!
//! ### Errors
//!
//! Fallible user functions return [`anyhow::Result`]. `retry_map` and `catch`
//! trap only the errors their [`ErrorFilter`] accepts; anything else aborts the
//! run and is returned unchanged from the run call. Invalid operator parameters
//! (a zero batch size, a non-positive rate) are reported when the run starts,
//! before any item is pulled.
//!
//! ### Execution
//!
//! [`Pipe::run`], [`Pipe::run_with`], [`Pipe::try_run_with`],
//! [`Pipe::collect`] and [`Pipe::collect_with_stats`] all go through the
//! [`Runner`], which is single-threaded. `rate_limit` and retry backoff block
//! the calling thread.
//!
//! ## Module Overview
//!
//! - [`pipeline`] - the `Pipe` builder and source constructors
//! - [`node`] - the pull-based [`Cursor`] interface operators implement
//! - [`runner`] - the execution engine
//! - [`stats`] - per-run counters
//! - [`error_filter`] / [`retry`] - failure classification and retry policy
//! - [`extensions`] - composite transforms and custom operators
//! - [`testing`] - assertions and fixtures for pipeline tests

mod collection;
pub mod error_filter;
pub mod extensions;
pub mod node;
pub mod pipeline;
pub mod retry;
pub mod runner;
pub mod stats;
pub mod testing;
mod helpers;

// General re-exports
pub use error_filter::ErrorFilter;
pub use node::{BoxCursor, Cursor};
pub use pipeline::{Explanation, Pipe, from_fn, pipe};
pub use retry::RetryPolicy;
pub use runner::Runner;
pub use stats::RunStats;
