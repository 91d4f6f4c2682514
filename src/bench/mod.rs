//! CRUD benchmark across SQLite and both MongoDB layouts.
//!
//! # Phases
//! ```text
//! setup  → sample invoice ids (sqlite, mongo_tx) and customer ids (mongo_cc)
//! read   → one timed lookup per sampled id
//! insert → insert_count new invoices per system
//! update → update_count quantity increments per system
//! delete → remove what the insert phase created
//! ```
//!
//! Each operation is timed on its own and pushed into [`BenchResults`].
//! An operation that errors is logged and left out of the timings.

pub mod mongo;
pub mod results;
pub mod runner;
pub mod sqlite;

pub use mongo::{CustomerCentricBench, TransactionalBench};
pub use results::{BenchRecord, BenchResults, OpSummary};
pub use runner::run_benchmarks;
pub use sqlite::SqliteBench;

use std::future::Future;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Run `op` and return its elapsed seconds, or its error.
pub(crate) fn time_sync<T, E>(op: impl FnOnce() -> Result<T, E>) -> Result<f64, E> {
    let started = Instant::now();
    op()?;
    Ok(started.elapsed().as_secs_f64())
}

pub(crate) async fn time_async<T, E, Fut>(op: Fut) -> Result<f64, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    let started = Instant::now();
    op.await?;
    Ok(started.elapsed().as_secs_f64())
}

/// Milliseconds since the epoch, used to keep inserted ids unique across runs.
pub(crate) fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_sync_propagates_errors() {
        let ok: Result<f64, &str> = time_sync(|| Ok::<_, &str>(()));
        assert!(ok.unwrap() >= 0.0);

        let err = time_sync(|| Err::<(), _>("boom"));
        assert_eq!(err, Err("boom"));
    }

    #[tokio::test]
    async fn test_time_async() {
        let elapsed = time_async(async { Ok::<_, std::io::Error>(1) }).await.unwrap();
        assert!(elapsed >= 0.0);
    }
}
