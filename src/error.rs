//! Top-level error for the command layer.

use thiserror::Error;

use crate::bench::BenchError;
use crate::cluster::ClusterError;
use crate::config::ConfigError;
use crate::dataset::DatasetError;
use crate::docstore::StoreError;

#[derive(Debug, Error)]
pub enum RetailError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document store error: {0}")]
    Store(#[from] StoreError),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("cluster description failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("benchmark failed: {0}")]
    Bench(#[from] BenchError),
}
