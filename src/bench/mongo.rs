//! MongoDB benchmark operations for the transaction-centric and
//! customer-centric layouts.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, DateTime, Document};
use mongodb::error::Error as MongoError;
use mongodb::{ClientSession, Collection};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::bench::results::BenchResults;
use crate::bench::sqlite::{BENCH_CUSTOMER, BENCH_PRODUCT};
use crate::bench::{time_async, unique_suffix};
use crate::docstore::{commit_or_abort, MongoStore};

const TX_SYSTEM: &str = "mongo_tx";
const CC_SYSTEM: &str = "mongo_cc";

fn sample_header(invoice_no: &str) -> Document {
    doc! {
        "_id": invoice_no,
        "invoiceDate": DateTime::now(),
        "customerId": BENCH_CUSTOMER,
    }
}

fn sample_item(invoice_no: &str) -> Document {
    doc! {
        "invoiceNo": invoice_no,
        "stockCode": BENCH_PRODUCT,
        "quantity": 1_i64,
        "unitPrice": 1.0,
    }
}

fn sample_embedded_invoice(invoice_no: &str) -> Document {
    doc! {
        "invoiceNo": invoice_no,
        "invoiceDate": DateTime::now(),
        "items": [{
            "stockCode": BENCH_PRODUCT,
            "description": "benchmark sample",
            "quantity": 1_i64,
            "unitPrice": 1.0,
        }],
    }
}

/// `_id`s of up to `limit` documents, in natural order.
async fn scan_ids(collection: &Collection<Document>, limit: i64) -> Result<Vec<Bson>, MongoError> {
    let docs: Vec<Document> = collection
        .find(doc! {})
        .projection(doc! { "_id": 1 })
        .limit(limit)
        .await?
        .try_collect()
        .await?;
    Ok(docs.into_iter().filter_map(|d| d.get("_id").cloned()).collect())
}

/// Benchmark over `invoices` and `invoice_items`.
pub struct TransactionalBench<'a> {
    store: &'a MongoStore,
    invoices: Collection<Document>,
    items: Collection<Document>,
    invoice_ids: Vec<Bson>,
    created: Vec<String>,
}

impl<'a> TransactionalBench<'a> {
    /// Sample up to `num_iter` ids among the first `scan_limit` invoices.
    pub async fn new<R: Rng>(
        store: &'a MongoStore,
        num_iter: usize,
        scan_limit: i64,
        rng: &mut R,
    ) -> Result<Self, MongoError> {
        let invoices = store.database().collection(&store.names().invoices);
        let items = store.database().collection(&store.names().invoice_items);
        let all = scan_ids(&invoices, scan_limit).await?;
        let invoice_ids: Vec<Bson> = all.choose_multiple(rng, num_iter.min(all.len())).cloned().collect();
        tracing::debug!(scanned = all.len(), sampled = invoice_ids.len(), "MongoDB invoice ids sampled");
        Ok(Self {
            store,
            invoices,
            items,
            invoice_ids,
            created: Vec::new(),
        })
    }

    pub fn sampled(&self) -> &[Bson] {
        &self.invoice_ids
    }

    /// Header plus items. Returns the number of items found.
    async fn read_invoice(&self, invoice_no: &Bson) -> Result<usize, MongoError> {
        self.invoices.find_one(doc! { "_id": invoice_no.clone() }).await?;
        let items: Vec<Document> = self
            .items
            .find(doc! { "invoiceNo": invoice_no.clone() })
            .await?
            .try_collect()
            .await?;
        Ok(items.len())
    }

    async fn insert_in_session(&self, session: &mut ClientSession, invoice_no: &str) -> Result<(), MongoError> {
        self.invoices
            .insert_one(sample_header(invoice_no))
            .session(&mut *session)
            .await?;
        self.items
            .insert_one(sample_item(invoice_no))
            .session(&mut *session)
            .await?;
        Ok(())
    }

    async fn insert_invoice(&self, invoice_no: &str) -> Result<(), MongoError> {
        let mut session = self.store.client().start_session().await?;
        session.start_transaction().await?;
        let result = self.insert_in_session(&mut session, invoice_no).await;
        commit_or_abort(&mut session, result).await
    }

    /// Increment the first matching item.
    async fn update_item(&self, invoice_no: &Bson) -> Result<u64, MongoError> {
        let result = self
            .items
            .update_one(
                doc! { "invoiceNo": invoice_no.clone() },
                doc! { "$inc": { "quantity": 1 } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn delete_in_session(&self, session: &mut ClientSession, invoice_no: &str) -> Result<(), MongoError> {
        self.items
            .delete_many(doc! { "invoiceNo": invoice_no })
            .session(&mut *session)
            .await?;
        self.invoices
            .delete_one(doc! { "_id": invoice_no })
            .session(&mut *session)
            .await?;
        Ok(())
    }

    async fn delete_invoice(&self, invoice_no: &str) -> Result<(), MongoError> {
        let mut session = self.store.client().start_session().await?;
        session.start_transaction().await?;
        let result = self.delete_in_session(&mut session, invoice_no).await;
        commit_or_abort(&mut session, result).await
    }

    pub async fn read_phase(&self, results: &mut BenchResults) {
        for invoice_no in &self.invoice_ids {
            match time_async(self.read_invoice(invoice_no)).await {
                Ok(t) => results.push(TX_SYSTEM, "read_invoice", t),
                Err(e) => results.record_failure(TX_SYSTEM, "read_invoice", &e),
            }
        }
    }

    pub async fn insert_phase(&mut self, count: usize, results: &mut BenchResults) {
        for i in 0..count {
            let invoice_no = format!("NEW_MTX_{i}_{}", unique_suffix());
            match time_async(self.insert_invoice(&invoice_no)).await {
                Ok(t) => {
                    results.push(TX_SYSTEM, "insert_invoice", t);
                    self.created.push(invoice_no);
                }
                Err(e) => results.record_failure(TX_SYSTEM, "insert_invoice", &e),
            }
        }
    }

    pub async fn update_phase(&self, count: usize, results: &mut BenchResults) {
        for invoice_no in self.invoice_ids.iter().take(count) {
            match time_async(self.update_item(invoice_no)).await {
                Ok(t) => results.push(TX_SYSTEM, "update_item", t),
                Err(e) => results.record_failure(TX_SYSTEM, "update_item", &e),
            }
        }
    }

    pub async fn delete_phase(&mut self, results: &mut BenchResults) {
        for invoice_no in std::mem::take(&mut self.created) {
            match time_async(self.delete_invoice(&invoice_no)).await {
                Ok(t) => results.push(TX_SYSTEM, "delete_invoice", t),
                Err(e) => results.record_failure(TX_SYSTEM, "delete_invoice", &e),
            }
        }
    }
}

/// Benchmark over `customers_cc`.
pub struct CustomerCentricBench {
    customers: Collection<Document>,
    customer_ids: Vec<Bson>,
    /// (customer id, invoice number) pairs created by the insert phase.
    created: Vec<(String, String)>,
}

impl CustomerCentricBench {
    /// Take the first `num_iter` customer ids.
    pub async fn new(store: &MongoStore, num_iter: usize) -> Result<Self, MongoError> {
        let customers = store.database().collection(&store.names().customers_cc);
        let limit = i64::try_from(num_iter).unwrap_or(i64::MAX);
        let customer_ids = scan_ids(&customers, limit).await?;
        tracing::debug!(sampled = customer_ids.len(), "MongoDB customer ids sampled");
        Ok(Self {
            customers,
            customer_ids,
            created: Vec::new(),
        })
    }

    pub fn sampled(&self) -> &[Bson] {
        &self.customer_ids
    }

    async fn read_customer(&self, customer_id: &Bson) -> Result<bool, MongoError> {
        let found = self.customers.find_one(doc! { "_id": customer_id.clone() }).await?;
        Ok(found.is_some())
    }

    async fn insert_invoice(&self, customer_id: &str, invoice_no: &str) -> Result<(), MongoError> {
        self.customers
            .update_one(
                doc! { "_id": customer_id },
                doc! {
                    "$setOnInsert": { "country": "XX" },
                    "$push": { "invoices": sample_embedded_invoice(invoice_no) },
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Increment the first item of the customer's first invoice.
    async fn update_item(&self, customer_id: &Bson) -> Result<u64, MongoError> {
        let result = self
            .customers
            .update_one(
                doc! { "_id": customer_id.clone() },
                doc! { "$inc": { "invoices.0.items.0.quantity": 1 } },
            )
            .await?;
        Ok(result.modified_count)
    }

    /// Pull the invoice, then drop the customer if it has none left.
    async fn delete_invoice(&self, customer_id: &str, invoice_no: &str) -> Result<(), MongoError> {
        self.customers
            .update_one(
                doc! { "_id": customer_id },
                doc! { "$pull": { "invoices": { "invoiceNo": invoice_no } } },
            )
            .await?;
        self.customers
            .delete_one(doc! { "_id": customer_id, "invoices": { "$size": 0 } })
            .await?;
        Ok(())
    }

    pub async fn read_phase(&self, results: &mut BenchResults) {
        for customer_id in &self.customer_ids {
            match time_async(self.read_customer(customer_id)).await {
                Ok(t) => results.push(CC_SYSTEM, "read_customer", t),
                Err(e) => results.record_failure(CC_SYSTEM, "read_customer", &e),
            }
        }
    }

    pub async fn insert_phase(&mut self, count: usize, results: &mut BenchResults) {
        for i in 0..count {
            let suffix = unique_suffix();
            let customer_id = format!("NEW_CUST_{i}_{suffix}");
            let invoice_no = format!("NEW_CC_{i}_{suffix}");
            match time_async(self.insert_invoice(&customer_id, &invoice_no)).await {
                Ok(t) => {
                    results.push(CC_SYSTEM, "insert_invoice", t);
                    self.created.push((customer_id, invoice_no));
                }
                Err(e) => results.record_failure(CC_SYSTEM, "insert_invoice", &e),
            }
        }
    }

    pub async fn update_phase(&self, count: usize, results: &mut BenchResults) {
        for customer_id in self.customer_ids.iter().take(count) {
            match time_async(self.update_item(customer_id)).await {
                Ok(t) => results.push(CC_SYSTEM, "update_item", t),
                Err(e) => results.record_failure(CC_SYSTEM, "update_item", &e),
            }
        }
    }

    pub async fn delete_phase(&mut self, results: &mut BenchResults) {
        for (customer_id, invoice_no) in std::mem::take(&mut self.created) {
            match time_async(self.delete_invoice(&customer_id, &invoice_no)).await {
                Ok(t) => results.push(CC_SYSTEM, "delete_invoice", t),
                Err(e) => results.record_failure(CC_SYSTEM, "delete_invoice", &e),
            }
        }
    }
}
