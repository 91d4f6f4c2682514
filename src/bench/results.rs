//! Benchmark measurements, summaries and the results file.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::bench::BenchError;
use crate::observability::metrics;

/// One timed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchRecord {
    pub system: &'static str,
    pub operation: &'static str,
    /// Elapsed wall time in seconds.
    pub time: f64,
}

/// Aggregate timings for one system/operation pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OpSummary {
    pub system: &'static str,
    pub operation: &'static str,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default)]
pub struct BenchResults {
    records: Vec<BenchRecord>,
    failures: usize,
}

impl BenchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, system: &'static str, operation: &'static str, time: f64) {
        metrics::record_bench_op(system, operation, time);
        self.records.push(BenchRecord {
            system,
            operation,
            time,
        });
    }

    /// Note an operation that errored and was left out of the timings.
    pub fn record_failure(&mut self, system: &'static str, operation: &'static str, error: &dyn std::fmt::Display) {
        tracing::warn!(system, operation, error = %error, "Benchmark operation failed");
        self.failures += 1;
    }

    pub fn records(&self) -> &[BenchRecord] {
        &self.records
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per system/operation statistics, in first-recorded order.
    pub fn summary(&self) -> Vec<OpSummary> {
        let mut keys: Vec<(&'static str, &'static str)> = Vec::new();
        for record in &self.records {
            let key = (record.system, record.operation);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        keys.into_iter()
            .map(|(system, operation)| {
                let mut times: Vec<f64> = self
                    .records
                    .iter()
                    .filter(|r| r.system == system && r.operation == operation)
                    .map(|r| r.time)
                    .collect();
                times.sort_by(f64::total_cmp);
                summarize(system, operation, &times)
            })
            .collect()
    }

    /// Write `system,operation,time` rows to a CSV file.
    pub fn write_csv(&self, path: &Path) -> Result<(), BenchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(["system", "operation", "time"])?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        tracing::info!(rows = self.records.len(), path = %path.display(), "Benchmark results saved");
        Ok(())
    }
}

/// `times` must be sorted and non-empty.
fn summarize(system: &'static str, operation: &'static str, times: &[f64]) -> OpSummary {
    let count = times.len();
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (times[mid - 1] + times[mid]) / 2.0
    } else {
        times[mid]
    };
    OpSummary {
        system,
        operation,
        count,
        mean: times.iter().sum::<f64>() / count as f64,
        median,
        min: times[0],
        max: times[count - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_statistics() {
        let mut results = BenchResults::new();
        for t in [0.4, 0.1, 0.3, 0.2] {
            results.push("sqlite", "read_invoice", t);
        }
        results.push("mongo_tx", "read_invoice", 1.0);

        let summary = results.summary();
        assert_eq!(summary.len(), 2);
        let sqlite = &summary[0];
        assert_eq!(sqlite.count, 4);
        assert!((sqlite.mean - 0.25).abs() < 1e-12);
        assert!((sqlite.median - 0.25).abs() < 1e-12);
        assert_eq!(sqlite.min, 0.1);
        assert_eq!(sqlite.max, 0.4);
        assert_eq!(summary[1].median, 1.0);
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/benchmark_results.csv");
        let mut results = BenchResults::new();
        results.push("sqlite", "insert_invoice", 0.5);
        results.push("mongo_cc", "update_item", 0.25);
        results.write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "system,operation,time\nsqlite,insert_invoice,0.5\nmongo_cc,update_item,0.25\n"
        );
    }

    #[test]
    fn test_write_csv_without_measurements_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark_results.csv");
        BenchResults::new().write_csv(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "system,operation,time\n");
    }
}
