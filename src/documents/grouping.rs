//! Grouping of line items by invoice number.

use std::collections::BTreeMap;

use crate::dataset::RetailRecord;

/// All line items of one invoice, in source order. Never empty.
#[derive(Debug, Clone)]
pub struct InvoiceGroup<'a> {
    invoice_no: &'a str,
    rows: Vec<&'a RetailRecord>,
}

impl<'a> InvoiceGroup<'a> {
    pub fn invoice_no(&self) -> &'a str {
        self.invoice_no
    }

    pub fn rows(&self) -> &[&'a RetailRecord] {
        &self.rows
    }

    /// The row invoice-level fields (date, customer, country) are taken from.
    pub fn first(&self) -> &'a RetailRecord {
        self.rows[0]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group records by invoice number, ordered by invoice number.
pub fn group_by_invoice(records: &[RetailRecord]) -> Vec<InvoiceGroup<'_>> {
    let mut groups: BTreeMap<&str, Vec<&RetailRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.invoice_no.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(invoice_no, rows)| InvoiceGroup { invoice_no, rows })
        .collect()
}
