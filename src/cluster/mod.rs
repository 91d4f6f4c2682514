//! Deployment description for the MongoDB cluster.
//!
//! Probes the server version and replica-set size, merges them with the
//! static facts from configuration and writes a JSON file.

use std::fs;
use std::path::Path;

use mongodb::bson::doc;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ClusterConfig, MongoConfig, MONGO_URI_ENV};
use crate::docstore::connect;
use crate::resilience::{retry, RetryPolicy};

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("MONGO_URI environment variable is not set")]
    MissingUri,

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replication {
    #[serde(rename = "type")]
    pub kind: String,
    pub nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionList {
    pub customers: String,
    pub products: String,
    pub invoices: String,
    pub invoice_items: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescription {
    pub cluster_name: String,
    pub provider: String,
    pub region: String,
    pub tier: String,
    pub replication: Replication,
    pub mongodb_version: String,
    pub database: String,
    pub collections: CollectionList,
    pub schema_model: String,
}

impl ClusterDescription {
    pub fn new(cluster: &ClusterConfig, mongo: &MongoConfig, version: String, nodes: usize) -> Self {
        let names = &mongo.collections;
        Self {
            cluster_name: cluster.name.clone(),
            provider: cluster.provider.clone(),
            region: cluster.region.clone(),
            tier: cluster.tier.clone(),
            replication: Replication {
                kind: cluster.replication_type.clone(),
                nodes,
            },
            mongodb_version: version,
            database: mongo.database.clone(),
            collections: CollectionList {
                customers: names.customers.clone(),
                products: names.products.clone(),
                invoices: names.invoices.clone(),
                invoice_items: names.invoice_items.clone(),
            },
            schema_model: cluster.schema_model.clone(),
        }
    }
}

/// Blank values count as unset.
fn uri_from(value: Option<String>) -> Result<String, ClusterError> {
    value
        .filter(|uri| !uri.trim().is_empty())
        .ok_or(ClusterError::MissingUri)
}

/// The connection string from `MONGO_URI`.
pub fn require_uri() -> Result<String, ClusterError> {
    uri_from(std::env::var(MONGO_URI_ENV).ok())
}

/// Server version from `buildInfo` and member count from `hello.hosts`.
///
/// A standalone server reports no hosts and counts as one node.
pub async fn probe(client: &Client, policy: &RetryPolicy) -> Result<(String, usize), ClusterError> {
    let admin = client.database("admin");
    let build_info = retry(policy, "buildInfo", || async {
        admin.run_command(doc! { "buildInfo": 1 }).await
    })
    .await?;
    let hello = retry(policy, "hello", || async { admin.run_command(doc! { "hello": 1 }).await }).await?;

    let version = build_info.get_str("version").unwrap_or("unknown").to_string();
    let nodes = hello.get_array("hosts").map(|hosts| hosts.len()).unwrap_or(1);
    Ok((version, nodes))
}

/// Connect with the `MONGO_URI` deployment and describe it.
pub async fn describe_cluster(
    cluster: &ClusterConfig,
    mongo: &MongoConfig,
    policy: &RetryPolicy,
) -> Result<ClusterDescription, ClusterError> {
    let mongo = MongoConfig {
        uri: require_uri()?,
        ..mongo.clone()
    };
    let client = connect(&mongo, policy).await?;
    let (version, nodes) = probe(&client, policy).await?;
    tracing::info!(version = %version, nodes, "Cluster probed");
    Ok(ClusterDescription::new(cluster, &mongo, version, nodes))
}

/// Write the description as JSON with 4-space indentation, creating the
/// parent directory.
pub fn write_description(description: &ClusterDescription, path: &Path) -> Result<(), ClusterError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    description.serialize(&mut serializer)?;
    fs::write(path, buf)?;
    tracing::info!(path = %path.display(), "Cluster configuration saved");
    Ok(())
}
