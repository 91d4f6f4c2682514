//! Document store seam.
//!
//! # Data Flow
//! ```text
//! ingest loaders
//!     → DocumentStore trait
//!         → mongo.rs  (driver sessions + transactions)
//!         → memory.rs (in-process, same write semantics)
//! ```
//!
//! Multi-document atomicity is the driver's job: `write_invoice` runs in one
//! transaction that commits on success and aborts on any error.

pub mod memory;
pub mod mongo;
pub mod types;

pub use memory::{MemoryState, MemoryStore};
pub use mongo::{commit_or_abort, connect, MongoStore};
pub use types::{StoreError, DUPLICATE_KEY_CODE};

use crate::documents::{CustomerInvoice, TransactionalInvoice};

/// Write operations the two document loaders need.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Atomically upsert the customer and products, insert the invoice
    /// header and insert its items.
    async fn write_invoice(&self, invoice: &TransactionalInvoice) -> Result<(), StoreError>;

    /// Upsert the customer document, setting `country` only on insert and
    /// appending the invoice to `invoices`.
    async fn push_customer_invoice(&self, invoice: &CustomerInvoice) -> Result<(), StoreError>;
}
