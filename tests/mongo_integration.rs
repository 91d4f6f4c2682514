//! MongoDB-backed tests. Skipped unless `MONGO_URI` is set; transactions
//! need a replica set.

use std::time::{SystemTime, UNIX_EPOCH};

use mongodb::bson::{doc, Document};
use retail_bench::config::RetailConfig;
use retail_bench::dataset::load_records;
use retail_bench::docstore::{connect, MongoStore};
use retail_bench::ingest::{load_customer_centric, load_transactional, IngestSettings};
use retail_bench::resilience::RetryPolicy;

mod common;

async fn scratch_store(config: &mut RetailConfig) -> Option<MongoStore> {
    let uri = common::mongo_uri()?;
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis();
    config.mongo.uri = uri;
    config.mongo.database = format!("retail_bench_test_{millis}");
    let client = connect(&config.mongo, &RetryPolicy::no_retry()).await.unwrap();
    Some(MongoStore::new(client, &config.mongo.database, config.mongo.collections.clone()))
}

#[tokio::test]
async fn test_transactional_rerun_reports_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::config_in(dir.path());
    let Some(store) = scratch_store(&mut config).await else {
        eprintln!("MONGO_URI not set, skipping");
        return;
    };
    let records = load_records(std::path::Path::new(&config.data.csv_path), 100).unwrap();
    let settings = IngestSettings::from_config(&config);

    let first = load_transactional(&store, &records, &settings).await;
    assert_eq!(first.loaded, 3);

    let second = load_transactional(&store, &records, &settings).await;
    assert_eq!(second.loaded, 0);
    assert_eq!(second.duplicates(), 3);

    let customers = store.database().collection::<Document>("customers");
    assert_eq!(customers.count_documents(doc! {}).await.unwrap(), 2);
    let products = store.database().collection::<Document>("products");
    assert_eq!(products.count_documents(doc! {}).await.unwrap(), 4);

    store.database().drop().await.unwrap();
}

#[tokio::test]
async fn test_customer_centric_nests_invoices() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::config_in(dir.path());
    let Some(store) = scratch_store(&mut config).await else {
        eprintln!("MONGO_URI not set, skipping");
        return;
    };
    let records = load_records(std::path::Path::new(&config.data.csv_path), 100).unwrap();

    let report = load_customer_centric(&store, &records, &IngestSettings::from_config(&config)).await;
    assert_eq!(report.loaded, 3);

    let customers = store.database().collection::<Document>("customers_cc");
    let doc = customers
        .find_one(doc! { "_id": "17850" })
        .await
        .unwrap()
        .unwrap();
    let invoices = doc.get_array("invoices").unwrap();
    assert_eq!(invoices.len(), 2);
    let first = invoices[0].as_document().unwrap();
    assert_eq!(first.get_array("items").unwrap().len(), 3);

    store.database().drop().await.unwrap();
}
