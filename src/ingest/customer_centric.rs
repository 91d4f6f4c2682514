//! Customer-centric loader.

use crate::dataset::RetailRecord;
use crate::docstore::DocumentStore;
use crate::documents::{group_by_invoice, CustomerInvoice};
use crate::ingest::report::{IngestFailure, IngestReport};
use crate::ingest::IngestSettings;
use crate::observability::metrics;
use crate::resilience::retry;

const MODEL: &str = "customer_centric";

/// Push up to `settings.target` invoices into their customer documents.
pub async fn load_customer_centric<S: DocumentStore>(
    store: &S,
    records: &[RetailRecord],
    settings: &IngestSettings,
) -> IngestReport {
    let mut report = IngestReport::default();

    for group in group_by_invoice(records) {
        if report.loaded >= settings.target {
            break;
        }

        let invoice = CustomerInvoice::from_group(&group);
        match retry(&settings.policy, "push_customer_invoice", || store.push_customer_invoice(&invoice)).await {
            Ok(()) => {
                report.loaded += 1;
                metrics::record_invoice_loaded(MODEL);
                if report.loaded % settings.progress_every.max(1) == 0 {
                    tracing::info!(loaded = report.loaded, "Inserted invoices (customer-centric)");
                }
            }
            Err(err) => {
                tracing::warn!(
                    invoice_no = %invoice.invoice.invoice_no,
                    customer_id = %invoice.customer_id,
                    error = %err,
                    "Failed inserting invoice into customer"
                );
                metrics::record_ingest_failure(MODEL);
                let key = format!("{}/{}", invoice.customer_id, invoice.invoice.invoice_no);
                report.failed.push(IngestFailure::new(key, &err));
            }
        }
    }

    tracing::info!(
        loaded = report.loaded,
        failed = report.failed.len(),
        "Done. Invoices inserted into customer-centric collection"
    );
    report
}
