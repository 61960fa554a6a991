//! Testing utilities for simplypipe pipelines.
//!
//! This module helps end-users write idiomatic Rust tests for their pipelines:
//!
//! - **Assertions**: run a pipeline and compare its output, counters, or failure
//! - **Fixtures**: shared recorders for side effects, fault injection for
//!   retry/catch paths, and small sample datasets
//!
//! # Quick Start
//!
//! ```no_run
//! use simplypipe::*;
//! use simplypipe::testing::*;
//!
//! #[test]
//! fn doubles_and_counts() {
//!     let seen = Recorder::new();
//!     let p = pipe(vec![1, 2, 3]).tap(seen.tap()).map(|x: i32| x * 2);
//!
//!     let stats = assert_emits(&p, &[2, 4, 6]);
//!     assert_counters(&stats, &RunStats { processed: 3, emitted: 3, ..RunStats::default() });
//!     assert_eq!(seen.take(), vec![1, 2, 3]);
//! }
//! ```
//!
//! # Assertion Functions
//!
//! - [`assert_emits`]: exact, order-dependent output comparison
//! - [`assert_counters`]: compare every counter except `duration`
//! - [`assert_deterministic`]: two runs agree on output and counters
//! - [`assert_fails_with`]: the run ends with an error of a given type
//! - [`assert_all`]: every element satisfies a predicate
//!
//! # Fixtures
//!
//! - [`Recorder`]: thread-safe vector usable from `tap`, `on_error`, and sinks
//! - [`FailFirst`]: fails the first N calls, then delegates to a function
//! - [`Transient`]: a small error type for exercising [`ErrorFilter`](crate::ErrorFilter)

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
