//! retail-bench
//!
//! Loads the Online Retail dataset into SQLite and MongoDB and benchmarks
//! CRUD operations across them.
//!
//! # Architecture Overview
//!
//! ```text
//!   online_retail.csv
//!          │
//!          ▼
//!   ┌─────────────┐   load-sql              ┌──────────────────┐
//!   │   dataset   │────────────────────────▶│ relational       │──▶ online_retail.db
//!   │ read, clean │                         │ schema + insert  │
//!   └──────┬──────┘                         └──────────────────┘
//!          │ load-transactional / load-customer-centric
//!          ▼
//!   ┌─────────────┐    ┌──────────────┐    ┌──────────────────┐
//!   │  documents  │───▶│    ingest    │───▶│ docstore (Mongo) │
//!   │  grouping   │    │ retry + skip │    │ sessions, upserts│
//!   └─────────────┘    └──────────────┘    └──────────────────┘
//!
//!   bench            → timed CRUD on SQLite + both layouts → benchmark_results.csv
//!   describe-cluster → buildInfo + hello → config/atlas_config.json
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use retail_bench::commands;
use retail_bench::config::load_config;
use retail_bench::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "retail-bench")]
#[command(about = "Load the Online Retail dataset and benchmark SQLite against MongoDB", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load records into the normalized SQLite schema
    LoadSql,
    /// Load invoices into the transaction-centric collections
    LoadTransactional,
    /// Load invoices into the customer-centric collection
    LoadCustomerCentric,
    /// Run the CRUD benchmark
    Bench {
        /// Skip the MongoDB layouts
        #[arg(long)]
        sqlite_only: bool,
    },
    /// Probe the cluster named by MONGO_URI and write its description
    DescribeCluster,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "retail-bench starting");

    let recorder = config
        .observability
        .metrics_snapshot
        .as_ref()
        .and_then(|_| metrics::install_recorder());

    match cli.command {
        Commands::LoadSql => {
            commands::run_load_sql(&config)?;
        }
        Commands::LoadTransactional => {
            if let Some(report) = commands::run_load_transactional(&config).await? {
                tracing::info!(loaded = report.loaded, duplicates = report.duplicates(), "Transactional load finished");
            }
        }
        Commands::LoadCustomerCentric => {
            if let Some(report) = commands::run_load_customer_centric(&config).await? {
                tracing::info!(loaded = report.loaded, failed = report.failed.len(), "Customer-centric load finished");
            }
        }
        Commands::Bench { sqlite_only } => {
            let results = commands::run_bench(&config, sqlite_only).await?;
            tracing::info!(measurements = results.len(), path = %config.benchmark.results_path, "Benchmark finished");
        }
        Commands::DescribeCluster => {
            let description = commands::run_describe_cluster(&config).await?;
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
    }

    if let (Some(handle), Some(path)) = (recorder.as_ref(), config.observability.metrics_snapshot.as_ref()) {
        metrics::write_snapshot(handle, Path::new(path))?;
    }

    Ok(())
}
