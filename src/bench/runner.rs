//! Benchmark orchestration.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;

use crate::bench::mongo::{CustomerCentricBench, TransactionalBench};
use crate::bench::results::{BenchResults, OpSummary};
use crate::bench::sqlite::SqliteBench;
use crate::bench::BenchError;
use crate::config::BenchmarkConfig;
use crate::docstore::MongoStore;

/// Run every phase against SQLite and, when a store is given, both MongoDB
/// layouts. Results are written to `config.results_path`.
pub async fn run_benchmarks(
    config: &BenchmarkConfig,
    sqlite: &Connection,
    mongo: Option<&MongoStore>,
) -> Result<BenchResults, BenchError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut results = BenchResults::new();

    let mut sql = SqliteBench::new(sqlite, config.num_iter, &mut rng)?;
    let mut docs = match mongo {
        Some(store) => Some((
            TransactionalBench::new(store, config.num_iter, config.id_scan_limit, &mut rng).await?,
            CustomerCentricBench::new(store, config.num_iter).await?,
        )),
        None => {
            tracing::info!("No MongoDB store configured, benchmarking SQLite only");
            None
        }
    };

    tracing::info!("Running read benchmarks");
    sql.read_phase(&mut results);
    if let Some((tx, cc)) = docs.as_ref() {
        tx.read_phase(&mut results).await;
        cc.read_phase(&mut results).await;
    }

    tracing::info!(count = config.insert_count, "Running insert benchmarks");
    sql.insert_phase(config.insert_count, &mut results);
    if let Some((tx, cc)) = docs.as_mut() {
        tx.insert_phase(config.insert_count, &mut results).await;
        cc.insert_phase(config.insert_count, &mut results).await;
    }

    tracing::info!(count = config.update_count, "Running update benchmarks");
    sql.update_phase(config.update_count, &mut results);
    if let Some((tx, cc)) = docs.as_ref() {
        tx.update_phase(config.update_count, &mut results).await;
        cc.update_phase(config.update_count, &mut results).await;
    }

    tracing::info!("Running delete benchmarks");
    sql.delete_phase(&mut results);
    if let Some((tx, cc)) = docs.as_mut() {
        tx.delete_phase(&mut results).await;
        cc.delete_phase(&mut results).await;
    }

    results.write_csv(Path::new(&config.results_path))?;
    log_summary(&results.summary());
    if results.failures() > 0 {
        tracing::warn!(failures = results.failures(), "Some benchmark operations failed");
    }
    Ok(results)
}

fn log_summary(summary: &[OpSummary]) {
    for op in summary {
        tracing::info!(
            system = op.system,
            operation = op.operation,
            count = op.count,
            mean = op.mean,
            median = op.median,
            min = op.min,
            max = op.max,
            "Benchmark summary"
        );
    }
}
