//! Fixtures for exercising side effects and failure paths.

use anyhow::Result;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Thread-safe shared vector for observing side effects.
///
/// Clones share the same storage, so a recorder can be moved into a `tap` or
/// `on_error` closure stored in a pipeline and read back afterwards.
///
/// # Example
///
/// ```
/// use simplypipe::*;
/// use simplypipe::testing::Recorder;
///
/// let seen = Recorder::new();
/// pipe(vec![1, 2]).tap(seen.tap()).run().unwrap();
/// assert_eq!(seen.take(), vec![1, 2]);
/// ```
#[derive(Debug)]
pub struct Recorder<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Recorder<T> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value.
    pub fn push(&self, item: T) {
        self.lock().push(item);
    }

    /// Number of recorded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.lock())
    }

    /// A sink closure that records every item.
    pub fn sink(&self) -> impl FnMut(T) + use<T> {
        let rec = self.clone();
        move |item| rec.push(item)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        // A panicking test thread must not hide what was recorded before it.
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + 'static> Recorder<T> {
    /// A `tap` closure that records a clone of every item.
    pub fn tap(&self) -> impl Fn(&T) + Send + Sync + use<T> {
        let rec = self.clone();
        move |item: &T| rec.push(item.clone())
    }

    /// A copy of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }
}

/// A recoverable-looking error for exercising retry and catch paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transient(pub &'static str);

impl fmt::Display for Transient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transient failure: {}", self.0)
    }
}

impl std::error::Error for Transient {}

/// A function wrapper that fails its first `failures` calls with [`Transient`].
///
/// The call counter is shared between clones and across items and runs.
///
/// # Example
///
/// ```
/// use simplypipe::testing::FailFirst;
///
/// let f = FailFirst::new(2, |x: &i32| x + 1);
/// assert!(f.call(&1).is_err());
/// assert!(f.call(&1).is_err());
/// assert_eq!(f.call(&1).unwrap(), 2);
/// assert_eq!(f.calls(), 3);
/// ```
pub struct FailFirst<F> {
    failures: usize,
    calls: Arc<AtomicUsize>,
    f: Arc<F>,
}

impl<F> Clone for FailFirst<F> {
    fn clone(&self) -> Self {
        Self {
            failures: self.failures,
            calls: Arc::clone(&self.calls),
            f: Arc::clone(&self.f),
        }
    }
}

impl<F> FailFirst<F> {
    /// Fail `failures` times, then delegate to `f`.
    pub fn new(failures: usize, f: F) -> Self {
        Self {
            failures,
            calls: Arc::new(AtomicUsize::new(0)),
            f: Arc::new(f),
        }
    }

    /// Calls made so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Invoke the wrapper once.
    ///
    /// # Errors
    ///
    /// Returns [`Transient`] while the failure budget lasts.
    pub fn call<T, O>(&self, item: &T) -> Result<O>
    where
        F: Fn(&T) -> O,
    {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(Transient("injected").into());
        }
        Ok((*self.f)(item))
    }

    /// The wrapper as a closure suitable for `retry_map` or `catch`.
    pub fn into_fn<T, O>(self) -> impl Fn(&T) -> Result<O> + Send + Sync + 'static
    where
        T: 'static,
        O: 'static,
        F: Fn(&T) -> O + Send + Sync + 'static,
    {
        move |item: &T| self.call(item)
    }
}

/// A handful of words with repeats and mixed case, for dedupe and filter tests.
#[must_use]
pub fn sample_words() -> Vec<String> {
    ["alpha", "Beta", "alpha", "gamma", "BETA", "delta", "gamma", "alpha"]
        .into_iter()
        .map(String::from)
        .collect()
}
