//! End-to-end SQLite load and benchmark through the command layer.

use retail_bench::commands;
use retail_bench::relational::{count_rows, open_database};

mod common;

#[test]
fn test_load_sql_inserts_distinct_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_in(dir.path());

    let summary = commands::run_load_sql(&config).unwrap().unwrap();

    assert_eq!(summary.customers.inserted, 2);
    assert_eq!(summary.products.inserted, 4);
    assert_eq!(summary.invoices.inserted, 3);
    // the duplicated lantern line is offered twice but stored once
    assert_eq!(summary.items.offered, 6);
    assert_eq!(summary.items.inserted, 5);

    let conn = open_database(std::path::Path::new(&config.sqlite.path)).unwrap();
    assert_eq!(count_rows(&conn, "Customer").unwrap(), 2);
    assert_eq!(count_rows(&conn, "Invoice").unwrap(), 3);
    let customer: String = conn
        .query_row("SELECT CustomerID FROM Invoice WHERE InvoiceNo = '536367'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(customer, "13047");
}

#[test]
fn test_load_sql_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_in(dir.path());

    commands::run_load_sql(&config).unwrap();
    let second = commands::run_load_sql(&config).unwrap().unwrap();

    assert_eq!(second.customers.inserted, 0);
    assert_eq!(second.invoices.inserted, 0);
    assert_eq!(second.items.inserted, 0);
}

#[test]
fn test_missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::config_in(dir.path());
    config.data.csv_path = dir.path().join("absent.csv").to_string_lossy().into_owned();

    let err = commands::run_load_sql(&config).unwrap_err();
    assert!(err.to_string().contains("absent.csv"));
    assert!(!std::path::Path::new(&config.sqlite.path).exists());
}

#[test]
fn test_empty_source_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::config_in(dir.path());
    let empty = dir.path().join("empty.csv");
    std::fs::write(&empty, format!("{}\n", common::HEADER)).unwrap();
    config.data.csv_path = empty.to_string_lossy().into_owned();

    assert!(commands::run_load_sql(&config).unwrap().is_none());
    assert!(!std::path::Path::new(&config.sqlite.path).exists());
}

#[tokio::test]
async fn test_sqlite_only_bench_after_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::config_in(dir.path());
    config.benchmark.num_iter = 10;
    config.benchmark.insert_count = 2;
    config.benchmark.update_count = 2;
    commands::run_load_sql(&config).unwrap();

    let results = commands::run_bench(&config, true).await.unwrap();

    // 3 reads, 2 inserts, 2 updates, 2 deletes
    assert_eq!(results.len(), 9);
    assert_eq!(results.failures(), 0);
    let written = std::fs::read_to_string(&config.benchmark.results_path).unwrap();
    assert!(written.starts_with("system,operation,time\n"));
    assert!(written.lines().skip(1).all(|line| line.starts_with("sqlite,")));
}
