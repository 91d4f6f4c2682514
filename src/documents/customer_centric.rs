//! Customer-centric layout: invoices and their items embedded in the
//! customer document.

use serde::{Deserialize, Serialize};

use crate::documents::grouping::InvoiceGroup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedItem {
    pub stock_code: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedInvoice {
    pub invoice_no: String,
    pub invoice_date: String,
    pub items: Vec<EmbeddedItem>,
}

/// One invoice addressed to its customer document.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerInvoice {
    pub customer_id: String,
    /// Only applied when the customer document is created.
    pub country: String,
    pub invoice: EmbeddedInvoice,
}

impl CustomerInvoice {
    pub fn from_group(group: &InvoiceGroup<'_>) -> Self {
        let first = group.first();
        Self {
            customer_id: first.customer_id.clone(),
            country: first.country.clone(),
            invoice: EmbeddedInvoice {
                invoice_no: group.invoice_no().to_string(),
                invoice_date: first.invoice_date.clone(),
                items: group
                    .rows()
                    .iter()
                    .map(|row| EmbeddedItem {
                        stock_code: row.stock_code.clone(),
                        description: row.description.clone(),
                        quantity: row.quantity,
                        unit_price: row.unit_price,
                    })
                    .collect(),
            },
        }
    }
}

/// A complete customer document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub country: String,
    pub invoices: Vec<EmbeddedInvoice>,
}

impl CustomerDocument {
    /// Fresh document for the first invoice seen for a customer.
    pub fn new(invoice: &CustomerInvoice) -> Self {
        Self {
            id: invoice.customer_id.clone(),
            country: invoice.country.clone(),
            invoices: Vec::new(),
        }
    }
}

/// Fold invoice groups into one document per customer, customers in
/// first-seen order and invoices in group order.
pub fn build_customer_documents(groups: &[InvoiceGroup<'_>]) -> Vec<CustomerDocument> {
    let mut documents: Vec<CustomerDocument> = Vec::new();
    for group in groups {
        let invoice = CustomerInvoice::from_group(group);
        let index = match documents.iter().position(|d| d.id == invoice.customer_id) {
            Some(index) => index,
            None => {
                documents.push(CustomerDocument::new(&invoice));
                documents.len() - 1
            }
        };
        documents[index].invoices.push(invoice.invoice);
    }
    documents
}
