//! Document layouts built from cleaned records.
//!
//! # Data Flow
//! ```text
//! Vec<RetailRecord>
//!     → grouping.rs (one group per invoice number)
//!     → transactional.rs   (header + items + customer + products per invoice)
//!     → customer_centric.rs (invoice with embedded items per customer)
//! ```

pub mod customer_centric;
pub mod grouping;
pub mod transactional;

pub use customer_centric::{
    build_customer_documents, CustomerDocument, CustomerInvoice, EmbeddedInvoice, EmbeddedItem,
};
pub use grouping::{group_by_invoice, InvoiceGroup};
pub use transactional::{CustomerDoc, InvoiceHeader, InvoiceItemDoc, ProductDoc, TransactionalInvoice};
