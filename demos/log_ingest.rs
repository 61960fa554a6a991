//! Log ingestion pipeline example.
//!
//! This example walks through a small ingest job:
//! 1. **Parse** raw access-log lines, skipping the malformed ones
//! 2. **Clean** by dropping duplicate request ids, health checks and server errors
//! 3. **Load** batches through a flaky uploader with retries, throttled
//!
//! Run with: cargo run --example log_ingest

use anyhow::{Context, Result, bail};
use simplypipe::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Request {
    id: u64,
    path: String,
    status: u16,
}

fn parse_line(line: &&str) -> Result<Request> {
    let mut parts = line.split_whitespace();
    let (Some(id), Some(path), Some(status)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected 3 fields in {line:?}");
    };
    Ok(Request {
        id: id.parse().with_context(|| format!("bad id in {line:?}"))?,
        path: path.to_string(),
        status: status.parse().with_context(|| format!("bad status in {line:?}"))?,
    })
}

fn raw_lines() -> Vec<&'static str> {
    vec![
        "1 /index 200",
        "2 /health 200",
        "3 /login 302",
        "garbage",
        "3 /login 302",
        "4 /cart 500",
        "5 /index 200",
        "6 /health 200",
        "7 /checkout 200",
        "8 /index abc",
        "9 /cart 200",
    ]
}

fn main() -> Result<()> {
    // Upload fails on every third call to show retries at work.
    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    let upload = move |batch: &Vec<Request>| -> Result<usize> {
        if c.fetch_add(1, Ordering::SeqCst) % 3 == 1 {
            bail!("upload timed out");
        }
        Ok(batch.len())
    };

    let ingest = pipe(raw_lines())
        .catch(parse_line, |line: &&str, e: &anyhow::Error| {
            eprintln!("skipping {line:?}: {e:#}");
        })
        .dedupe_by(|r: &Request| r.id)
        .filter(|r: &Request| r.path != "/health" && r.status < 500)
        .batch(3)
        .rate_limit(20.0)
        .retry_map_with(
            upload,
            RetryPolicy::new()
                .with_retries(2)
                .with_backoff(Duration::from_millis(10)),
        );

    println!("{}", ingest.explain());

    let mut uploaded = 0;
    let stats = Runner::new()
        .with_name("log_ingest")
        .run(&ingest, |n| {
            uploaded += n;
            Ok(())
        })?;

    println!("uploaded {uploaded} requests in {} batches", stats.batches);
    stats.print();
    println!("{}", serde_json::to_string_pretty(&stats.to_json())?);
    Ok(())
}
