//! Transaction-centric layout: flat documents referencing customers and
//! products by id.

use serde::{Deserialize, Serialize};

use crate::documents::grouping::InvoiceGroup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceHeader {
    #[serde(rename = "_id")]
    pub invoice_no: String,
    pub invoice_date: String,
    pub customer_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemDoc {
    pub invoice_no: String,
    pub stock_code: String,
    pub quantity: i64,
    pub unit_price: f64,
}

/// Everything one invoice writes, in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionalInvoice {
    pub header: InvoiceHeader,
    pub items: Vec<InvoiceItemDoc>,
    pub customer: CustomerDoc,
    /// One entry per distinct stock code, first-seen description.
    pub products: Vec<ProductDoc>,
}

impl TransactionalInvoice {
    pub fn from_group(group: &InvoiceGroup<'_>) -> Self {
        let first = group.first();
        let invoice_no = group.invoice_no().to_string();

        let items = group
            .rows()
            .iter()
            .map(|row| InvoiceItemDoc {
                invoice_no: invoice_no.clone(),
                stock_code: row.stock_code.clone(),
                quantity: row.quantity,
                unit_price: row.unit_price,
            })
            .collect();

        let mut products: Vec<ProductDoc> = Vec::new();
        for row in group.rows() {
            if !products.iter().any(|p| p.id == row.stock_code) {
                products.push(ProductDoc {
                    id: row.stock_code.clone(),
                    description: row.description.clone(),
                });
            }
        }

        Self {
            header: InvoiceHeader {
                invoice_no,
                invoice_date: first.invoice_date.clone(),
                customer_id: first.customer_id.clone(),
            },
            items,
            customer: CustomerDoc {
                id: first.customer_id.clone(),
                country: first.country.clone(),
            },
            products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::grouping::group_by_invoice;
    use crate::documents::test_support::record;

    #[test]
    fn test_invoice_from_group() {
        let mut second = record("536365", "71053", "17850");
        second.description = "WHITE METAL LANTERN".to_string();
        let mut repeat = record("536365", "71053", "17850");
        repeat.description = "LANTERN (relabelled)".to_string();
        let records = vec![record("536365", "85123A", "17850"), second, repeat];

        let groups = group_by_invoice(&records);
        let invoice = TransactionalInvoice::from_group(&groups[0]);

        assert_eq!(invoice.header.invoice_no, "536365");
        assert_eq!(invoice.header.customer_id, "17850");
        assert_eq!(invoice.items.len(), 3);
        assert_eq!(invoice.products.len(), 2);
        assert_eq!(invoice.products[1].description, "WHITE METAL LANTERN");
        assert_eq!(invoice.customer.country, "United Kingdom");
    }

    #[test]
    fn test_field_names() {
        let header = InvoiceHeader {
            invoice_no: "1".to_string(),
            invoice_date: "now".to_string(),
            customer_id: "0".to_string(),
        };
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json, serde_json::json!({"_id": "1", "invoiceDate": "now", "customerId": "0"}));
    }
}
