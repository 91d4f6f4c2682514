//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use retail_bench::config::RetailConfig;

pub const HEADER: &str = "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country";

/// Eight rows over three invoices, two customers and four products, with
/// one exact duplicate line and one row missing its customer.
pub const FIXTURE_ROWS: &[&str] = &[
    "536365,85123A,WHITE HANGING HEART T-LIGHT HOLDER,6,12/1/2010 8:26,2.55,17850.0,United Kingdom",
    "536365,71053,WHITE METAL LANTERN,6,12/1/2010 8:26,3.39,17850.0,United Kingdom",
    "536365,71053,WHITE METAL LANTERN,6,12/1/2010 8:26,3.39,17850.0,United Kingdom",
    "536366,22633,HAND WARMER UNION JACK,6,12/1/2010 8:28,1.85,17850.0,United Kingdom",
    "536367,84879,ASSORTED COLOUR BIRD ORNAMENT,32,12/1/2010 8:34,1.69,13047.0,United Kingdom",
    "536367,22633,HAND WARMER UNION JACK,12,12/1/2010 8:34,1.85,13047.0,United Kingdom",
    "536368,22960,JAM MAKING SET WITH JARS,6,12/1/2010 8:34,4.25,,United Kingdom",
    "536369,,,1,12/1/2010 8:35,0.0,13047.0,United Kingdom",
];

/// Write the fixture CSV into `dir` and return its path.
pub fn write_fixture_csv(dir: &Path) -> PathBuf {
    let path = dir.join("online_retail.csv");
    let mut content = String::from(HEADER);
    for row in FIXTURE_ROWS {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

/// Configuration pointing every output into `dir`.
pub fn config_in(dir: &Path) -> RetailConfig {
    let mut config = RetailConfig::default();
    config.data.csv_path = write_fixture_csv(dir).to_string_lossy().into_owned();
    config.sqlite.path = dir.join("online_retail.db").to_string_lossy().into_owned();
    config.benchmark.results_path = dir.join("benchmark_results.csv").to_string_lossy().into_owned();
    config.cluster.output_path = dir.join("config/atlas_config.json").to_string_lossy().into_owned();
    config
}

/// `MONGO_URI`, when MongoDB-backed tests should run.
#[allow(dead_code)]
pub fn mongo_uri() -> Option<String> {
    std::env::var("MONGO_URI").ok().filter(|uri| !uri.trim().is_empty())
}
