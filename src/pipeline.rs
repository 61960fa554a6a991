use crate::node::{BoxCursor, Cursor, SourceCursor};
use anyhow::Result;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::Arc;

/// Re-callable recipe that builds a fresh cursor chain for one run.
pub(crate) type Plan<T> = Arc<dyn Fn() -> Result<BoxCursor<T>> + Send + Sync>;

/// Immutable, lazily-evaluated chain of operators over a source.
///
/// Every operator method consumes the builder and returns a new one whose plan
/// wraps the previous plan, so the prefix is shared rather than copied. Clone a
/// `Pipe` to branch it; the original is never affected.
///
/// Nothing runs until one of the run methods is called, and every run starts
/// again from a freshly created source iterator.
pub struct Pipe<T> {
    pub(crate) plan: Plan<T>,
    pub(crate) stages: Vec<String>,
}

impl<T> Clone for Pipe<T> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            stages: self.stages.clone(),
        }
    }
}

/// Build a pipeline over a re-iterable source.
///
/// The source is cloned at the start of each run, which is cheap for ranges and
/// `Arc`-backed data and a full copy for owned collections.
///
/// # Example
/// ```
/// use simplypipe::*;
///
/// let out = pipe(1..=3).map(|x: i32| x * 2).collect().unwrap();
/// assert_eq!(out, vec![2, 4, 6]);
/// ```
pub fn pipe<I>(source: I) -> Pipe<I::Item>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
    I::IntoIter: 'static,
    I::Item: 'static,
{
    from_fn(move || source.clone())
}

/// Build a pipeline whose source is produced by `factory` once per run.
///
/// A factory that hands out the same one-shot iterator every time only yields
/// items on the first run; later runs see an empty source.
pub fn from_fn<F, I>(factory: F) -> Pipe<I::Item>
where
    F: Fn() -> I + Send + Sync + 'static,
    I: IntoIterator,
    I::IntoIter: 'static,
    I::Item: 'static,
{
    let plan: Plan<I::Item> = Arc::new(move || {
        let source: BoxCursor<I::Item> = Box::new(SourceCursor::new(factory().into_iter()));
        Ok(source)
    });
    Pipe {
        plan,
        stages: Vec::new(),
    }
}

impl<T: 'static> Pipe<T> {
    /// Append one operator.
    ///
    /// `wrap` receives the upstream cursor at run time and returns the operator's
    /// cursor, or an error if the operator is misconfigured. It is called once per
    /// run, before anything is pulled.
    pub(crate) fn chain<O, F>(self, label: impl Into<String>, wrap: F) -> Pipe<O>
    where
        O: 'static,
        F: Fn(BoxCursor<T>) -> Result<BoxCursor<O>> + Send + Sync + 'static,
    {
        let upstream = self.plan;
        let plan: Plan<O> = Arc::new(move || wrap(upstream()?));
        let mut stages = self.stages;
        stages.push(label.into());
        Pipe { plan, stages }
    }

    /// Convenience over [`chain`](Self::chain) for operators that cannot fail to build.
    pub(crate) fn chain_with<O, C, F>(self, label: impl Into<String>, wrap: F) -> Pipe<O>
    where
        O: 'static,
        C: Cursor<Item = O> + 'static,
        F: Fn(BoxCursor<T>) -> C + Send + Sync + 'static,
    {
        self.chain(label, move |up| {
            let cursor: BoxCursor<O> = Box::new(wrap(up));
            Ok(cursor)
        })
    }

    /// Materialize the cursor chain for one run.
    pub(crate) fn build(&self) -> Result<BoxCursor<T>> {
        (self.plan)()
    }

    /// Labels of the registered operators, in registration order.
    #[must_use]
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Describe the operator chain without running it.
    #[must_use]
    pub fn explain(&self) -> Explanation {
        Explanation {
            steps: self.stages.clone(),
        }
    }
}

/// Human-readable view of a pipeline's operator chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    /// Operator labels from source to sink.
    pub steps: Vec<String>,
}

impl Display for Explanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "source")?;
        for step in &self.steps {
            write!(f, " -> {step}")?;
        }
        write!(f, " -> sink")
    }
}
