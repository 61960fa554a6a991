//! Classification of recoverable failures.
//!
//! `retry_map` and `catch` only trap errors their [`ErrorFilter`] accepts;
//! anything else is treated as fatal and aborts the run unchanged.
//!
//! ```
//! use simplypipe::ErrorFilter;
//! use std::io;
//!
//! let only_io = ErrorFilter::of::<io::Error>();
//! let err = anyhow::Error::new(io::Error::other("disk"));
//! assert!(only_io.matches(&err));
//! assert!(!only_io.matches(&anyhow::anyhow!("not io")));
//! ```

use anyhow::Error;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&Error) -> bool + Send + Sync>;

/// A set of error kinds an operator treats as recoverable.
#[derive(Clone)]
pub struct ErrorFilter {
    predicates: Vec<Predicate>,
    names: Vec<&'static str>,
}

impl ErrorFilter {
    /// Accept every error.
    #[must_use]
    pub fn any() -> Self {
        Self::matching_named("any", |_| true)
    }

    /// Accept errors whose underlying type (or context) is `E`.
    #[must_use]
    pub fn of<E>() -> Self
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        Self::matching_named(std::any::type_name::<E>(), |e: &Error| e.is::<E>())
    }

    /// Accept errors for which `pred` returns true.
    ///
    /// Use this when recoverability depends on the error's contents, e.g. a
    /// single variant of an error enum.
    pub fn matching<P>(pred: P) -> Self
    where
        P: Fn(&Error) -> bool + Send + Sync + 'static,
    {
        Self::matching_named("custom", pred)
    }

    /// Extend the set with type `E`.
    #[must_use]
    pub fn or<E>(mut self) -> Self
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(|e: &Error| e.is::<E>()));
        self.names.push(std::any::type_name::<E>());
        self
    }

    /// Whether `err` belongs to this set.
    #[must_use]
    pub fn matches(&self, err: &Error) -> bool {
        self.predicates.iter().any(|p| p(err))
    }

    fn matching_named<P>(name: &'static str, pred: P) -> Self
    where
        P: Fn(&Error) -> bool + Send + Sync + 'static,
    {
        Self {
            predicates: vec![Arc::new(pred)],
            names: vec![name],
        }
    }
}

impl Default for ErrorFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl Debug for ErrorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorFilter").field(&self.names).finish()
    }
}
