use anyhow::Result;
use simplypipe::testing::*;
use simplypipe::*;

#[test]
fn dedupe_removes_duplicates() -> Result<()> {
    let stats = assert_emits(&pipe(vec![1, 2, 1, 3, 2]).dedupe(), &[1, 2, 3]);
    assert_eq!(stats.dropped, 2);
    Ok(())
}

#[test]
fn dedupe_preserves_first_seen_order() -> Result<()> {
    let (out, stats) = pipe(vec![3, 1, 2, 1, 3]).dedupe().collect_with_stats()?;
    assert_eq!(out, vec![3, 1, 2]);
    assert_eq!(stats.dropped, 2);
    assert_eq!(stats.processed, 5);
    assert_eq!(stats.emitted, 3);
    Ok(())
}

#[test]
fn dedupe_by_key_keeps_first_item_per_key() -> Result<()> {
    let out = pipe(vec!["a", "A", "b"])
        .dedupe_by(|s: &&str| s.to_lowercase())
        .collect()?;
    assert_eq!(out, vec!["a", "b"]);
    Ok(())
}

#[test]
fn dedupe_by_on_records() -> Result<()> {
    let rows = vec![(1, "first"), (2, "second"), (1, "again"), (3, "third")];
    let out = pipe(rows).dedupe_by(|r: &(i32, &str)| r.0).collect()?;
    assert_eq!(out, vec![(1, "first"), (2, "second"), (3, "third")]);
    Ok(())
}

#[test]
fn bounded_dedupe_evicts_oldest() -> Result<()> {
    // max_size=2: [1, 2] fill the window, 3 evicts 1, so 1 reappears later.
    let stats = assert_emits(&pipe(vec![1, 2, 3, 1]).dedupe_within(2), &[1, 2, 3, 1]);
    assert_eq!(stats.dropped, 0);
    Ok(())
}

#[test]
fn bounded_dedupe_still_drops_within_window() -> Result<()> {
    let (out, stats) = pipe(vec![1, 2, 2, 1, 3, 3, 2])
        .dedupe_within(2)
        .collect_with_stats()?;
    // 3 evicts 1; the final 2 is still inside the window {2, 3}.
    assert_eq!(out, vec![1, 2, 3]);
    assert_eq!(stats.dropped, 4);
    Ok(())
}

#[test]
fn bounded_dedupe_does_not_refresh_on_repeat() -> Result<()> {
    // Seeing 1 again does not make it "recent": 3 still evicts it.
    let out = pipe(vec![1, 2, 1, 3, 1]).dedupe_within(2).collect()?;
    assert_eq!(out, vec![1, 2, 3, 1]);
    Ok(())
}

#[test]
fn bounded_dedupe_by_key() -> Result<()> {
    let out = pipe(sample_words())
        .dedupe_by_within(|w: &String| w.to_lowercase(), 1)
        .collect()?;
    // Only the previous key is remembered, so only adjacent repeats vanish.
    assert_eq!(
        out,
        vec!["alpha", "Beta", "alpha", "gamma", "BETA", "delta", "gamma", "alpha"]
    );

    let out = pipe(vec!["x", "X", "y", "Y", "x"])
        .dedupe_by_within(|s: &&str| s.to_lowercase(), 1)
        .collect()?;
    assert_eq!(out, vec!["x", "y", "x"]);
    Ok(())
}

#[test]
fn zero_window_lets_everything_through() -> Result<()> {
    let (out, stats) = pipe(vec![5, 5, 5]).dedupe_within(0).collect_with_stats()?;
    assert_eq!(out, vec![5, 5, 5]);
    assert_eq!(stats.dropped, 0);
    Ok(())
}

#[test]
fn dedupe_state_does_not_leak_between_runs() -> Result<()> {
    let p = pipe(vec![4, 4, 5]).dedupe();
    let first = assert_deterministic(&p);
    assert_eq!(first, vec![4, 5]);
    Ok(())
}

#[test]
fn dedupe_and_filter_both_count_as_dropped() -> Result<()> {
    let stats = pipe(vec![1, 1, 2, 3, 4, 4])
        .dedupe()
        .filter(|x: &i32| x % 2 == 0)
        .run()?;
    assert_counters(
        &stats,
        &RunStats {
            processed: 6,
            emitted: 2,
            dropped: 4,
            ..RunStats::default()
        },
    );
    Ok(())
}
