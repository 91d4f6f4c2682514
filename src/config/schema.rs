//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the loaders
//! and the benchmark. All types derive Serde traits for deserialization from
//! config files, and every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable that overrides `mongo.uri`.
pub const MONGO_URI_ENV: &str = "MONGO_URI";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RetailConfig {
    /// Source CSV settings.
    pub data: DataConfig,

    /// Relational store settings.
    pub sqlite: SqliteConfig,

    /// Document store connection settings.
    pub mongo: MongoConfig,

    /// Retry policy for document store calls.
    pub retry: RetryConfig,

    /// Benchmark settings.
    pub benchmark: BenchmarkConfig,

    /// Static cluster facts written by `describe-cluster`.
    pub cluster: ClusterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Source CSV configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the retail transactions CSV.
    pub csv_path: String,

    /// Minimum number of records the relational loader targets.
    pub sql_records: usize,

    /// Row multiplier for the relational loader.
    pub sql_overfetch: usize,

    /// Number of invoices the document loaders ingest.
    pub document_invoices: usize,

    /// Row multiplier for the document loaders.
    pub document_overfetch: usize,

    /// Log a progress line every this many invoices.
    pub progress_every: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: "online_retail.csv".to_string(),
            sql_records: 1000,
            sql_overfetch: 2,
            document_invoices: 1000,
            document_overfetch: 3,
            progress_every: 100,
        }
    }
}

impl DataConfig {
    /// Raw rows read by the relational loader.
    pub fn sql_row_limit(&self) -> usize {
        self.sql_records.saturating_mul(self.sql_overfetch)
    }

    /// Raw rows read by the document loaders.
    pub fn document_row_limit(&self) -> usize {
        self.document_invoices.saturating_mul(self.document_overfetch)
    }
}

/// Relational store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file path.
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "online_retail.db".to_string(),
        }
    }
}

/// Document store connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string. `MONGO_URI` takes precedence when set.
    pub uri: String,

    /// Database name.
    pub database: String,

    /// Maximum connections in the driver pool.
    pub max_pool_size: u32,

    /// Minimum connections in the driver pool.
    pub min_pool_size: u32,

    /// Server selection timeout in milliseconds.
    pub server_selection_timeout_ms: u64,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Collection names.
    pub collections: CollectionNames,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "online_retail".to_string(),
            max_pool_size: 100,
            min_pool_size: 0,
            server_selection_timeout_ms: 5000,
            connect_timeout_ms: 10_000,
            collections: CollectionNames::default(),
        }
    }
}

impl MongoConfig {
    /// Apply the `MONGO_URI` environment override, if present.
    pub fn apply_env(&mut self) {
        if let Ok(uri) = std::env::var(MONGO_URI_ENV) {
            if !uri.trim().is_empty() {
                self.uri = uri;
            }
        }
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Fixed collection names for both document layouts.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CollectionNames {
    pub customers: String,
    pub products: String,
    pub invoices: String,
    pub invoice_items: String,
    /// Customer-centric collection.
    pub customers_cc: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            customers: "customers".to_string(),
            products: "products".to_string(),
            invoices: "invoices".to_string(),
            invoice_items: "invoice_items".to_string(),
            customers_cc: "customers_cc".to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first call.
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds.
    pub base_delay_ms: u64,

    /// Multiplier applied to the delay after each retry.
    pub backoff: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            backoff: 2.0,
        }
    }
}

/// Benchmark configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Sampled ids per read test.
    pub num_iter: usize,

    /// New invoices created per system in the insert phase.
    pub insert_count: usize,

    /// Sampled ids per update test.
    pub update_count: usize,

    /// RNG seed for id sampling.
    pub seed: u64,

    /// Cap on `_id`s fetched before sampling from `invoices`.
    pub id_scan_limit: i64,

    /// Output CSV path.
    pub results_path: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            num_iter: 100,
            insert_count: 10,
            update_count: 20,
            seed: 42,
            id_scan_limit: 10_000,
            results_path: "benchmark_results.csv".to_string(),
        }
    }
}

/// Static cluster facts for the description file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub name: String,
    pub provider: String,
    pub region: String,
    pub tier: String,
    pub replication_type: String,
    pub schema_model: String,
    /// Output JSON path.
    pub output_path: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "Cluster0".to_string(),
            provider: "AWS".to_string(),
            region: "ap-south-1 (Mumbai)".to_string(),
            tier: "M0 (Free Tier)".to_string(),
            replication_type: "Replica Set".to_string(),
            schema_model: "transaction-centric".to_string(),
            output_path: "config/atlas_config.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Write a Prometheus text snapshot here when the command finishes.
    pub metrics_snapshot: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_snapshot: None,
        }
    }
}
