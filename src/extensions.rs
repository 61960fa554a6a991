//! Extension points for custom pipeline stages.
//!
//! - [`CompositeTransform`]: package several operators into one reusable stage
//! - [`Pipe::with_operator`]: plug in a hand-written [`Cursor`](crate::Cursor)
//!
//! Both build on the same lazy chain as the built-in operators, so custom
//! stages share the run's [`RunStats`](crate::RunStats) and are re-created
//! fresh for every run.

use crate::node::BoxCursor;
use crate::pipeline::Pipe;
use anyhow::Result;

/// A reusable, packaged sequence of operators.
///
/// # Example: Email Normalization
/// ```
/// use simplypipe::*;
/// use simplypipe::extensions::CompositeTransform;
///
/// struct NormalizeEmails;
///
/// impl CompositeTransform<String, String> for NormalizeEmails {
///     fn expand(&self, input: Pipe<String>) -> Pipe<String> {
///         input
///             .map(|email: String| email.trim().to_lowercase())
///             .filter(|email: &String| email.contains('@'))
///             .dedupe()
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let emails = pipe(vec![
///     "  Alice@EXAMPLE.com  ".to_string(),
///     "invalid".to_string(),
///     "alice@example.com".to_string(),
///     "bob@test.com".to_string(),
/// ]);
///
/// let result = emails.apply_composite(&NormalizeEmails).collect()?;
/// assert_eq!(result, vec!["alice@example.com", "bob@test.com"]);
/// # Ok(())
/// # }
/// ```
pub trait CompositeTransform<I, O>: Send + Sync {
    /// Append this transform's operators to `input`.
    fn expand(&self, input: Pipe<I>) -> Pipe<O>;
}

impl<T: 'static> Pipe<T> {
    /// Apply a composite transform to this pipeline.
    ///
    /// The receiver is left untouched; the transform expands a clone of it.
    pub fn apply_composite<O, CT>(&self, transform: &CT) -> Pipe<O>
    where
        CT: CompositeTransform<T, O> + ?Sized,
    {
        transform.expand(self.clone())
    }

    /// Append a custom operator.
    ///
    /// `wrap` is called once per run with the upstream cursor and returns the
    /// operator's cursor. Returning an error rejects the run before any item is
    /// pulled, which is the place to validate parameters.
    ///
    /// # Example
    /// ```
    /// use simplypipe::*;
    ///
    /// struct Pairwise<T> { upstream: BoxCursor<T>, prev: Option<T> }
    ///
    /// impl<T: Clone> Cursor for Pairwise<T> {
    ///     type Item = (T, T);
    ///     fn pull(&mut self, stats: &mut RunStats) -> anyhow::Result<Option<(T, T)>> {
    ///         while let Some(item) = self.upstream.pull(stats)? {
    ///             if let Some(prev) = self.prev.replace(item.clone()) {
    ///                 return Ok(Some((prev, item)));
    ///             }
    ///         }
    ///         Ok(None)
    ///     }
    /// }
    ///
    /// let pairs = pipe(vec![1, 2, 3])
    ///     .with_operator("pairwise", |upstream| {
    ///         let cursor: BoxCursor<(i32, i32)> = Box::new(Pairwise { upstream, prev: None });
    ///         Ok(cursor)
    ///     })
    ///     .collect()
    ///     .unwrap();
    /// assert_eq!(pairs, vec![(1, 2), (2, 3)]);
    /// ```
    #[must_use]
    pub fn with_operator<O, F>(self, label: impl Into<String>, wrap: F) -> Pipe<O>
    where
        O: 'static,
        F: Fn(BoxCursor<T>) -> Result<BoxCursor<O>> + Send + Sync + 'static,
    {
        self.chain(label, wrap)
    }
}
