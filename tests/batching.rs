use anyhow::Result;
use simplypipe::testing::*;
use simplypipe::*;

#[test]
fn batch_groups_items_with_trailing_partial() -> Result<()> {
    let stats = assert_emits(
        &pipe(0..7).batch(3),
        &[vec![0, 1, 2], vec![3, 4, 5], vec![6]],
    );
    assert_eq!(stats.batches, 3);
    assert_eq!(stats.processed, 7);
    assert_eq!(stats.emitted, 3);
    Ok(())
}

#[test]
fn batch_exact_multiple_has_no_partial() -> Result<()> {
    let (out, stats) = pipe(0..6).batch(3).collect_with_stats()?;
    assert_eq!(out, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    assert_eq!(stats.batches, 2);
    Ok(())
}

#[test]
fn batch_size_one() -> Result<()> {
    let out = pipe(vec![10, 20]).batch(1).collect()?;
    assert_eq!(out, vec![vec![10], vec![20]]);
    Ok(())
}

#[test]
fn batch_larger_than_source_emits_one_group() -> Result<()> {
    let (out, stats) = pipe(vec![1, 2]).batch(10).collect_with_stats()?;
    assert_eq!(out, vec![vec![1, 2]]);
    assert_eq!(stats.batches, 1);
    Ok(())
}

#[test]
fn batch_of_empty_source_emits_nothing() -> Result<()> {
    let (out, stats) = pipe(Vec::<u8>::new()).batch(4).collect_with_stats()?;
    assert!(out.is_empty());
    assert_eq!(stats.batches, 0);
    Ok(())
}

#[test]
fn batch_count_is_ceil_of_n_over_size() -> Result<()> {
    for n in [0usize, 1, 5, 16, 17, 103] {
        for size in [1usize, 2, 3, 8, 16, 200] {
            let (out, stats) = pipe(0..n).batch(size).collect_with_stats()?;
            let expected = n.div_ceil(size);
            assert_eq!(out.len(), expected, "n={n} size={size}");
            assert_eq!(stats.batches, expected as u64, "n={n} size={size}");
            assert_all(&out, |g| !g.is_empty() && g.len() <= size);
            let flat: Vec<usize> = out.into_iter().flatten().collect();
            assert_eq!(flat, (0..n).collect::<Vec<_>>());
        }
    }
    Ok(())
}

#[test]
fn batch_zero_is_rejected_before_any_work() {
    let seen = Recorder::new();
    let p = pipe(vec![1, 2, 3]).tap(seen.tap()).batch(0);
    let err = p.run().unwrap_err();
    assert!(err.to_string().contains("batch size"), "{err}");
    assert!(seen.is_empty());
}

#[test]
fn batch_emits_full_groups_lazily() -> Result<()> {
    // The first group must be emitted before the source is drained.
    let out = pipe(0u64..).batch(2).take(2).collect()?;
    assert_eq!(out, vec![vec![0, 1], vec![2, 3]]);
    Ok(())
}

#[test]
fn batches_can_be_mapped() -> Result<()> {
    let sums = pipe(1..=10)
        .batch(4)
        .map(|g: Vec<i32>| g.iter().sum::<i32>())
        .collect()?;
    assert_eq!(sums, vec![10, 26, 19]);
    Ok(())
}

#[test]
fn huge_batch_size_holds_whole_source() -> Result<()> {
    // Sizes far beyond the input must not reserve memory up front.
    for size in [usize::MAX, 1usize << 34] {
        let (out, stats) = pipe(vec![1, 2, 3]).batch(size).collect_with_stats()?;
        assert_eq!(out, vec![vec![1, 2, 3]]);
        assert_eq!(stats.batches, 1);
    }
    Ok(())
}
