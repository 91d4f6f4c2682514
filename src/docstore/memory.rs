//! In-process document store.
//!
//! Mirrors the MongoDB write semantics the loaders depend on: upserts are
//! idempotent, a second invoice header with the same `_id` is rejected, and
//! a failed transaction leaves no partial writes. Transient failures can be
//! injected to exercise the retry path.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::docstore::types::StoreError;
use crate::docstore::DocumentStore;
use crate::documents::{
    CustomerDocument, CustomerInvoice, InvoiceHeader, InvoiceItemDoc, TransactionalInvoice,
};

/// Contents of the in-memory collections, keyed by `_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryState {
    /// customer id → country
    pub customers: BTreeMap<String, String>,
    /// stock code → description
    pub products: BTreeMap<String, String>,
    pub invoices: BTreeMap<String, InvoiceHeader>,
    pub invoice_items: Vec<InvoiceItemDoc>,
    pub customers_cc: BTreeMap<String, CustomerDocument>,
}

#[derive(Debug, Default)]
struct Inner {
    state: MemoryState,
    pending_failures: u32,
    calls: u32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` calls fail with `StoreError::Unavailable`.
    pub fn inject_transient_failures(&self, count: u32) {
        self.lock().pending_failures = count;
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> MemoryState {
        self.lock().state.clone()
    }

    /// Number of store calls made, including failed ones.
    pub fn calls(&self) -> u32 {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        let mut inner = self.lock();
        inner.calls += 1;
        if inner.pending_failures > 0 {
            inner.pending_failures -= 1;
            return Err(StoreError::Unavailable("injected connection failure".to_string()));
        }
        Ok(inner)
    }
}

impl DocumentStore for MemoryStore {
    async fn write_invoice(&self, invoice: &TransactionalInvoice) -> Result<(), StoreError> {
        let mut inner = self.begin()?;
        let state = &mut inner.state;

        // Checked before any write so a rejected invoice changes nothing.
        if state.invoices.contains_key(&invoice.header.invoice_no) {
            return Err(StoreError::DuplicateKey {
                collection: "invoices".to_string(),
                key: invoice.header.invoice_no.clone(),
            });
        }

        state
            .customers
            .insert(invoice.customer.id.clone(), invoice.customer.country.clone());
        for product in &invoice.products {
            state.products.insert(product.id.clone(), product.description.clone());
        }
        state
            .invoices
            .insert(invoice.header.invoice_no.clone(), invoice.header.clone());
        state.invoice_items.extend(invoice.items.iter().cloned());
        Ok(())
    }

    async fn push_customer_invoice(&self, invoice: &CustomerInvoice) -> Result<(), StoreError> {
        let mut inner = self.begin()?;
        inner
            .state
            .customers_cc
            .entry(invoice.customer_id.clone())
            .or_insert_with(|| CustomerDocument::new(invoice))
            .invoices
            .push(invoice.invoice.clone());
        Ok(())
    }
}
