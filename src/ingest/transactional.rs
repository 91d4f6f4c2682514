//! Transaction-centric loader.

use crate::dataset::RetailRecord;
use crate::docstore::DocumentStore;
use crate::documents::{group_by_invoice, TransactionalInvoice};
use crate::ingest::report::{IngestFailure, IngestReport};
use crate::ingest::IngestSettings;
use crate::observability::metrics;
use crate::resilience::retry;

const MODEL: &str = "transactional";

/// Write up to `settings.target` invoices, one transaction each.
///
/// A failed invoice is logged and skipped; it does not count toward the
/// target.
pub async fn load_transactional<S: DocumentStore>(
    store: &S,
    records: &[RetailRecord],
    settings: &IngestSettings,
) -> IngestReport {
    let mut report = IngestReport::default();

    for group in group_by_invoice(records) {
        if report.loaded >= settings.target {
            break;
        }

        let invoice = TransactionalInvoice::from_group(&group);
        match retry(&settings.policy, "write_invoice", || store.write_invoice(&invoice)).await {
            Ok(()) => {
                report.loaded += 1;
                metrics::record_invoice_loaded(MODEL);
                if report.loaded % settings.progress_every.max(1) == 0 {
                    tracing::info!(loaded = report.loaded, "Inserted invoices (transactional)");
                }
            }
            Err(err) => {
                tracing::warn!(
                    invoice_no = %invoice.header.invoice_no,
                    error = %err,
                    "Failed to insert invoice"
                );
                metrics::record_ingest_failure(MODEL);
                report.failed.push(IngestFailure::new(invoice.header.invoice_no.clone(), &err));
            }
        }
    }

    tracing::info!(
        loaded = report.loaded,
        failed = report.failed.len(),
        "Done. Transactional invoices inserted"
    );
    report
}
