//! Outcome of a document load.

use crate::docstore::StoreError;

/// An invoice that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFailure {
    /// Invoice number (and customer id for the customer-centric loader).
    pub key: String,
    pub reason: String,
    /// The store rejected a primary/unique key.
    pub duplicate: bool,
}

impl IngestFailure {
    pub fn new(key: impl Into<String>, err: &StoreError) -> Self {
        Self {
            key: key.into(),
            reason: err.to_string(),
            duplicate: err.is_duplicate_key(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Invoices written successfully.
    pub loaded: usize,
    pub failed: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn duplicates(&self) -> usize {
        self.failed.iter().filter(|f| f.duplicate).count()
    }
}
