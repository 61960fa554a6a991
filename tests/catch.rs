use anyhow::{Result, anyhow, bail};
use simplypipe::testing::*;
use simplypipe::*;
use std::io;

fn parse(s: &&str) -> Result<i32> {
    Ok(s.parse::<i32>()?)
}

#[test]
fn catch_skips_failures_and_reports_each_once() -> Result<()> {
    let failed = Recorder::new();
    let f = failed.clone();
    let (out, stats) = pipe(vec!["1", "x", "3", "y"])
        .catch(parse, move |item: &&str, _e| f.push(item.to_string()))
        .collect_with_stats()?;

    assert_eq!(out, vec![1, 3]);
    assert_eq!(failed.take(), vec!["x", "y"]);
    assert_counters(
        &stats,
        &RunStats {
            processed: 4,
            emitted: 2,
            errors: 2,
            ..RunStats::default()
        },
    );
    Ok(())
}

#[test]
fn catch_handler_receives_the_error() -> Result<()> {
    let messages = Recorder::new();
    let m = messages.clone();
    pipe(vec![0, 2])
        .catch(
            |x: &i32| -> Result<i32> {
                if *x == 0 {
                    bail!("division by zero");
                }
                Ok(10 / x)
            },
            move |_: &i32, e: &anyhow::Error| m.push(e.to_string()),
        )
        .run()?;
    assert_eq!(messages.take(), vec!["division by zero"]);
    Ok(())
}

#[test]
fn catch_does_not_count_failures_as_dropped() -> Result<()> {
    let stats = pipe(vec!["a", "b"]).catch(parse, |_, _| {}).run()?;
    assert_eq!(stats.errors, 2);
    assert_eq!(stats.dropped, 0);
    assert_eq!(stats.emitted, 0);
    Ok(())
}

#[test]
fn catch_only_traps_matching_errors() -> Result<()> {
    let f = FailFirst::new(1, |x: &i32| *x);
    let out = pipe(vec![1, 2, 3])
        .catch_only(f.into_fn(), |_, _| {}, ErrorFilter::of::<Transient>())
        .collect()?;
    assert_eq!(out, vec![2, 3]);
    Ok(())
}

#[test]
fn catch_only_lets_other_errors_abort_the_run() {
    let handled = Recorder::new();
    let h = handled.clone();
    let p = pipe(vec![1, 2]).catch_only(
        |_: &i32| -> Result<i32> { Err(io::Error::other("broken pipe").into()) },
        move |x: &i32, _e| h.push(*x),
        ErrorFilter::of::<Transient>(),
    );

    let err = assert_fails_with::<_, io::Error>(&p);
    assert_eq!(err.to_string(), "broken pipe");
    assert!(handled.is_empty());
}

#[test]
fn catch_only_with_custom_predicate() -> Result<()> {
    let filter = ErrorFilter::matching(|e| e.to_string().contains("soft"));
    let out = pipe(vec![1, 2, 3])
        .catch_only(
            |x: &i32| -> Result<i32> {
                if *x == 2 {
                    return Err(anyhow!("soft failure"));
                }
                Ok(*x)
            },
            |_, _| {},
            filter,
        )
        .collect()?;
    assert_eq!(out, vec![1, 3]);
    Ok(())
}

#[test]
fn try_map_fails_fast() {
    let seen = Recorder::new();
    let p = pipe(vec!["1", "oops", "3"])
        .try_map(|s: &str| -> Result<i32> { Ok(s.parse::<i32>()?) })
        .tap(seen.tap());

    let err = p.run().unwrap_err();
    assert!(err.is::<std::num::ParseIntError>(), "{err:#}");
    // Items before the failure went through; nothing after it did.
    assert_eq!(seen.take(), vec![1]);
}

#[test]
fn try_map_success_path() -> Result<()> {
    let out = pipe(vec!["4", "5"])
        .try_map(|s: &str| -> Result<i32> { Ok(s.parse::<i32>()?) })
        .collect()?;
    assert_eq!(out, vec![4, 5]);
    Ok(())
}

#[test]
fn fatal_error_is_returned_unmodified() {
    let p = pipe(vec![1]).try_map(|_: i32| -> Result<i32> { Err(Transient("upstream").into()) });
    let err = assert_fails_with::<_, Transient>(&p);
    assert_eq!(err.downcast_ref::<Transient>(), Some(&Transient("upstream")));
    assert_eq!(err.chain().count(), 1);
}

#[test]
fn catch_and_retry_compose() -> Result<()> {
    // Retry absorbs the injected failure; catch drops the unparsable item.
    let f = FailFirst::new(1, |s: &&str| s.to_string());
    let policy = RetryPolicy::new()
        .with_retries(1)
        .with_backoff(std::time::Duration::ZERO);
    let (out, stats) = pipe(vec!["7", "z", "9"])
        .retry_map_with(f.into_fn(), policy)
        .catch(|s: &String| Ok(s.parse::<i32>()?), |_, _| {})
        .collect_with_stats()?;
    assert_eq!(out, vec![7, 9]);
    assert_eq!(stats.errors, 2);
    Ok(())
}
