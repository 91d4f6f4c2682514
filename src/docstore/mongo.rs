//! MongoDB-backed document store.
//!
//! # Responsibilities
//! - Build the driver client (pool size, timeouts, retryable writes) and
//!   fail early with a ping
//! - Write transaction-centric invoices inside a multi-document transaction
//! - Upsert customer-centric documents with `$setOnInsert` / `$push`

use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, ClientSession, Collection, Database};

use crate::config::{CollectionNames, MongoConfig};
use crate::docstore::types::StoreError;
use crate::docstore::DocumentStore;
use crate::documents::{
    CustomerDoc, CustomerInvoice, InvoiceHeader, InvoiceItemDoc, ProductDoc, TransactionalInvoice,
};
use crate::resilience::{retry, RetryPolicy};

/// Create a client from configuration and verify the deployment answers.
///
/// The ping goes through the retry wrapper so a briefly unreachable server
/// does not abort the run.
pub async fn connect(config: &MongoConfig, policy: &RetryPolicy) -> Result<Client, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&config.uri).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.server_selection_timeout = Some(config.server_selection_timeout());
    options.connect_timeout = Some(config.connect_timeout());
    options.retry_writes = Some(true);
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    let client = Client::with_options(options)?;
    let admin = client.database("admin");
    retry(policy, "ping", || async { admin.run_command(doc! { "ping": 1 }).await }).await?;

    tracing::info!(
        database = %config.database,
        max_pool_size = config.max_pool_size,
        "MongoDB client connected"
    );
    Ok(client)
}

/// Commit the session's transaction when `result` is Ok, abort it otherwise.
pub async fn commit_or_abort<T, E>(session: &mut ClientSession, result: Result<T, E>) -> Result<T, E>
where
    E: From<mongodb::error::Error>,
{
    match result {
        Ok(value) => {
            session.commit_transaction().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(abort) = session.abort_transaction().await {
                tracing::warn!(error = %abort, "Failed to abort transaction");
            }
            Err(err)
        }
    }
}

/// Document store over a MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    names: CollectionNames,
}

impl MongoStore {
    pub fn new(client: Client, database: &str, names: CollectionNames) -> Self {
        let database = client.database(database);
        Self {
            client,
            database,
            names,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn names(&self) -> &CollectionNames {
        &self.names
    }

    fn customers(&self) -> Collection<CustomerDoc> {
        self.database.collection(&self.names.customers)
    }

    fn products(&self) -> Collection<ProductDoc> {
        self.database.collection(&self.names.products)
    }

    fn invoices(&self) -> Collection<InvoiceHeader> {
        self.database.collection(&self.names.invoices)
    }

    fn invoice_items(&self) -> Collection<InvoiceItemDoc> {
        self.database.collection(&self.names.invoice_items)
    }

    fn customers_cc(&self) -> Collection<Document> {
        self.database.collection(&self.names.customers_cc)
    }

    async fn write_in_session(
        &self,
        session: &mut ClientSession,
        invoice: &TransactionalInvoice,
    ) -> Result<(), StoreError> {
        self.customers()
            .update_one(
                doc! { "_id": invoice.customer.id.as_str() },
                doc! { "$set": { "country": invoice.customer.country.as_str() } },
            )
            .upsert(true)
            .session(&mut *session)
            .await?;

        for product in &invoice.products {
            self.products()
                .update_one(
                    doc! { "_id": product.id.as_str() },
                    doc! { "$set": { "description": product.description.as_str() } },
                )
                .upsert(true)
                .session(&mut *session)
                .await?;
        }

        self.invoices()
            .insert_one(&invoice.header)
            .session(&mut *session)
            .await?;

        self.invoice_items()
            .insert_many(&invoice.items)
            .ordered(true)
            .session(&mut *session)
            .await?;

        Ok(())
    }
}

impl DocumentStore for MongoStore {
    async fn write_invoice(&self, invoice: &TransactionalInvoice) -> Result<(), StoreError> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        let result = self.write_in_session(&mut session, invoice).await;
        commit_or_abort(&mut session, result).await
    }

    async fn push_customer_invoice(&self, invoice: &CustomerInvoice) -> Result<(), StoreError> {
        let embedded = to_bson(&invoice.invoice)?;
        self.customers_cc()
            .update_one(
                doc! { "_id": invoice.customer_id.as_str() },
                doc! {
                    "$setOnInsert": { "country": invoice.country.as_str() },
                    "$push": { "invoices": embedded },
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for MongoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoStore")
            .field("database", &self.database.name())
            .field("collections", &self.names)
            .finish()
    }
}
