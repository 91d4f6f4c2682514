//! Relational store (SQLite).
//!
//! # Data Flow
//! ```text
//! Vec<RetailRecord>
//!     → loader.rs (distinct customer/product/invoice tuples + all items)
//!     → INSERT OR IGNORE into the schema.rs tables, one transaction
//!     → LoadSummary (offered vs inserted per table)
//! ```

pub mod loader;
pub mod schema;

pub use loader::{count_rows, insert_records, LoadSummary, NormalizedRows, TableCount};
pub use schema::{open_database, open_in_memory, setup_schema};
