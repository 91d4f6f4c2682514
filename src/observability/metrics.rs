//! Metrics collection and exposition.
//!
//! # Metrics
//! - `retail_rows_loaded_total` (counter): rows inserted into the relational store, by table
//! - `retail_invoices_loaded_total` (counter): invoices written, by document model
//! - `retail_ingest_failures_total` (counter): invoices skipped after a write failure
//! - `retail_retry_attempts_total` (counter): retries taken, by operation
//! - `retail_bench_op_seconds` (histogram): benchmark timings, by system and operation
//!
//! Without an installed recorder every call is a no-op. `install_recorder`
//! sets up a Prometheus recorder whose text rendering can be written to a
//! file at the end of a command.

use std::fs;
use std::path::Path;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the process-wide Prometheus recorder.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Write the current metric values in Prometheus text format.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, handle.render())?;
    tracing::info!(path = %path.display(), "Metrics snapshot written");
    Ok(())
}

pub fn record_rows_loaded(table: &'static str, rows: usize) {
    counter!("retail_rows_loaded_total", "table" => table).increment(rows as u64);
}

pub fn record_invoice_loaded(model: &'static str) {
    counter!("retail_invoices_loaded_total", "model" => model).increment(1);
}

pub fn record_ingest_failure(model: &'static str) {
    counter!("retail_ingest_failures_total", "model" => model).increment(1);
}

pub fn record_retry(operation: &str) {
    counter!("retail_retry_attempts_total", "operation" => operation.to_string()).increment(1);
}

pub fn record_bench_op(system: &'static str, operation: &'static str, seconds: f64) {
    histogram!("retail_bench_op_seconds", "system" => system, "operation" => operation)
        .record(seconds);
}
