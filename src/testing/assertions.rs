//! Assertion functions for testing pipeline runs.
//!
//! Each helper runs the pipeline itself (where it takes a [`Pipe`]) and panics
//! with a detailed message on mismatch, so tests read as a single line.

use crate::pipeline::Pipe;
use crate::stats::RunStats;
use std::fmt::{Debug, Display};

/// Run `pipe` and assert it emits exactly `expected`, in order.
///
/// Returns the run's stats for further checks.
///
/// # Panics
///
/// Panics if the run fails or the output differs in length or content.
///
/// # Example
///
/// ```
/// use simplypipe::*;
/// use simplypipe::testing::assert_emits;
///
/// let stats = assert_emits(&pipe(vec![1, 2, 3]).filter(|x: &i32| *x > 1), &[2, 3]);
/// assert_eq!(stats.dropped, 1);
/// ```
pub fn assert_emits<T>(pipe: &Pipe<T>, expected: &[T]) -> RunStats
where
    T: Debug + PartialEq + 'static,
{
    let (actual, stats) = match pipe.collect_with_stats() {
        Ok(done) => done,
        Err(e) => panic!("Pipeline run failed: {e:#}\n  Stages: {:?}", pipe.stages()),
    };

    assert_eq!(
        actual.len(),
        expected.len(),
        "Output length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Output mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
    stats
}

/// Assert that two stats records agree on every counter; `duration` is ignored.
///
/// # Panics
///
/// Panics listing each counter that differs.
///
/// # Example
///
/// ```
/// use simplypipe::RunStats;
/// use simplypipe::testing::assert_counters;
///
/// let stats = RunStats { processed: 4, emitted: 2, dropped: 2, ..RunStats::default() };
/// assert_counters(&stats, &RunStats { processed: 4, emitted: 2, dropped: 2, ..RunStats::default() });
/// ```
pub fn assert_counters(actual: &RunStats, expected: &RunStats) {
    let pairs = [
        ("processed", actual.processed, expected.processed),
        ("emitted", actual.emitted, expected.emitted),
        ("dropped", actual.dropped, expected.dropped),
        ("batches", actual.batches, expected.batches),
        ("errors", actual.errors, expected.errors),
    ];
    let diffs: Vec<String> = pairs
        .iter()
        .filter(|(_, a, e)| a != e)
        .map(|(name, a, e)| format!("{name}: expected {e}, got {a}"))
        .collect();
    assert!(
        diffs.is_empty(),
        "Counter mismatch:\n  {}\n  Actual: {actual}\n  Expected: {expected}",
        diffs.join("\n  ")
    );
}

/// Run `pipe` twice and assert both runs agree on output and counters.
///
/// The source must be re-iterable. Returns the output of the first run.
///
/// # Panics
///
/// Panics if either run fails or the runs disagree.
pub fn assert_deterministic<T>(pipe: &Pipe<T>) -> Vec<T>
where
    T: Debug + PartialEq + 'static,
{
    let run = || match pipe.collect_with_stats() {
        Ok(done) => done,
        Err(e) => panic!("Pipeline run failed: {e:#}"),
    };
    let (first, first_stats) = run();
    let (second, second_stats) = run();
    assert_eq!(first, second, "Runs emitted different items");
    assert_counters(&second_stats, &first_stats);
    first
}

/// Run `pipe` and assert it fails with an error of type `E`.
///
/// Returns the error so the caller can inspect it further.
///
/// # Panics
///
/// Panics if the run succeeds or fails with a different error type.
///
/// # Example
///
/// ```
/// use simplypipe::*;
/// use simplypipe::testing::{assert_fails_with, Transient};
///
/// let p = pipe(vec![1]).try_map(|_: i32| -> anyhow::Result<i32> { Err(Transient("down").into()) });
/// let err = assert_fails_with::<_, Transient>(&p);
/// assert_eq!(err.to_string(), "transient failure: down");
/// ```
pub fn assert_fails_with<T, E>(pipe: &Pipe<T>) -> anyhow::Error
where
    T: 'static,
    E: Display + Debug + Send + Sync + 'static,
{
    match pipe.run() {
        Ok(stats) => panic!(
            "Expected run to fail with {}, but it succeeded: {stats}",
            std::any::type_name::<E>()
        ),
        Err(e) => {
            assert!(
                e.is::<E>(),
                "Expected error of type {}, got: {e:#}",
                std::any::type_name::<E>()
            );
            e
        }
    }
}

/// Assert that all elements in a collection satisfy a predicate.
///
/// # Panics
///
/// Panics if any element does not satisfy the predicate.
///
/// # Example
///
/// ```
/// use simplypipe::testing::assert_all;
///
/// let groups = vec![vec![1, 2], vec![3, 4], vec![5]];
/// assert_all(&groups, |g| g.len() <= 2);
/// ```
pub fn assert_all<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    for (i, item) in collection.iter().enumerate() {
        assert!(
            predicate(item),
            "Predicate failed for element at index {i}:\n  Element: {item:?}\n  Collection: {collection:?}"
        );
    }
}
