//! One function per CLI subcommand.
//!
//! Each returns `Ok(None)` when the source yields no usable rows; nothing
//! is written in that case.

use std::path::Path;

use crate::bench::{run_benchmarks, BenchResults};
use crate::cluster::{describe_cluster, write_description, ClusterDescription};
use crate::config::RetailConfig;
use crate::dataset::{load_records, RetailRecord};
use crate::docstore::{connect, MongoStore};
use crate::error::RetailError;
use crate::ingest::{load_customer_centric, load_transactional, IngestReport, IngestSettings};
use crate::relational::{insert_records, open_database, setup_schema, LoadSummary};
use crate::resilience::RetryPolicy;

fn source_records(config: &RetailConfig, limit: usize) -> Result<Option<Vec<RetailRecord>>, RetailError> {
    let records = load_records(Path::new(&config.data.csv_path), limit)?;
    if records.is_empty() {
        tracing::warn!(path = %config.data.csv_path, "No data loaded");
        return Ok(None);
    }
    Ok(Some(records))
}

async fn mongo_store(config: &RetailConfig) -> Result<MongoStore, RetailError> {
    let policy = RetryPolicy::from(&config.retry);
    let client = connect(&config.mongo, &policy).await?;
    Ok(MongoStore::new(
        client,
        &config.mongo.database,
        config.mongo.collections.clone(),
    ))
}

/// Load the CSV into the normalized SQLite schema.
pub fn run_load_sql(config: &RetailConfig) -> Result<Option<LoadSummary>, RetailError> {
    let Some(records) = source_records(config, config.data.sql_row_limit())? else {
        return Ok(None);
    };

    let mut conn = open_database(Path::new(&config.sqlite.path))?;
    setup_schema(&conn)?;
    let summary = insert_records(&mut conn, &records)?;

    tracing::info!(
        path = %config.sqlite.path,
        customers = summary.customers.inserted,
        products = summary.products.inserted,
        invoices = summary.invoices.inserted,
        items = summary.items.inserted,
        "Data inserted into SQLite"
    );
    Ok(Some(summary))
}

pub async fn run_load_transactional(config: &RetailConfig) -> Result<Option<IngestReport>, RetailError> {
    let Some(records) = source_records(config, config.data.document_row_limit())? else {
        return Ok(None);
    };
    let store = mongo_store(config).await?;
    let report = load_transactional(&store, &records, &IngestSettings::from_config(config)).await;
    Ok(Some(report))
}

pub async fn run_load_customer_centric(config: &RetailConfig) -> Result<Option<IngestReport>, RetailError> {
    let Some(records) = source_records(config, config.data.document_row_limit())? else {
        return Ok(None);
    };
    let store = mongo_store(config).await?;
    let report = load_customer_centric(&store, &records, &IngestSettings::from_config(config)).await;
    Ok(Some(report))
}

/// Benchmark SQLite and, unless `sqlite_only`, both MongoDB layouts.
pub async fn run_bench(config: &RetailConfig, sqlite_only: bool) -> Result<BenchResults, RetailError> {
    let conn = open_database(Path::new(&config.sqlite.path))?;
    setup_schema(&conn)?;

    let store = if sqlite_only {
        None
    } else {
        Some(mongo_store(config).await?)
    };

    let results = run_benchmarks(&config.benchmark, &conn, store.as_ref()).await?;
    Ok(results)
}

pub async fn run_describe_cluster(config: &RetailConfig) -> Result<ClusterDescription, RetailError> {
    let policy = RetryPolicy::from(&config.retry);
    let description = describe_cluster(&config.cluster, &config.mongo, &policy).await?;
    write_description(&description, Path::new(&config.cluster.output_path))?;
    Ok(description)
}
