//! Per-run accounting.
//!
//! A [`RunStats`] is created fresh by every execution call, borrowed mutably by
//! each operator cursor while it produces an item, and handed back to the
//! caller once the pipeline has been pulled to exhaustion.
//!
//! # Example
//!
//! ```no_run
//! use simplypipe::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let stats = pipe(vec![1, 2, 3, 4])
//!     .filter(|x: &i32| x % 2 == 0)
//!     .run()?;
//!
//! stats.print();
//! stats.save_to_file("run.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Counters and timing for a single pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Items pulled from the source.
    pub processed: u64,
    /// Items delivered to the sink.
    pub emitted: u64,
    /// Items removed by `filter` or `dedupe`.
    pub dropped: u64,
    /// Groups produced by `batch`.
    pub batches: u64,
    /// Recoverable failures trapped by `retry_map` or `catch`.
    pub errors: u64,
    /// Wall-clock time of the whole run.
    #[serde(serialize_with = "as_secs_f64")]
    pub duration: Duration,
}

fn as_secs_f64<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl RunStats {
    /// Create an all-zero record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// Compare every counter except `duration`.
    ///
    /// Two runs of the same builder over the same source agree on all counters,
    /// while their timing naturally differs.
    #[must_use]
    pub fn same_counters(&self, other: &Self) -> bool {
        self.processed == other.processed
            && self.emitted == other.emitted
            && self.dropped == other.dropped
            && self.batches == other.batches
            && self.errors == other.errors
    }

    /// All fields as a JSON object, `duration` in seconds.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "processed": self.processed,
            "emitted": self.emitted,
            "dropped": self.dropped,
            "batches": self.batches,
            "errors": self.errors,
            "duration": self.duration_secs(),
        })
    }

    /// Print the record to stdout in a human-readable format.
    pub fn print(&self) {
        println!("\n============ Run Stats ============");
        println!(
            "Execution Time: {:.3}s ({} ms)",
            self.duration_secs(),
            self.duration.as_millis()
        );
        println!("-----------------------------------");
        println!("processed: {}", self.processed);
        println!("emitted: {}", self.emitted);
        println!("dropped: {}", self.dropped);
        println!("batches: {}", self.batches);
        println!("errors: {}", self.errors);
        println!("===================================\n");
    }

    /// Save the record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        let formatted = serde_json::to_string_pretty(self)?;
        file.write_all(formatted.as_bytes())?;
        Ok(())
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} emitted={} dropped={} batches={} errors={} duration={:.3}s",
            self.processed,
            self.emitted,
            self.dropped,
            self.batches,
            self.errors,
            self.duration_secs()
        )
    }
}
