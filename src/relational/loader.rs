//! Bulk insert-or-ignore of cleaned records into the normalized tables.

use std::collections::HashSet;
use std::hash::Hash;

use rusqlite::{params, Connection};

use crate::dataset::RetailRecord;
use crate::observability::metrics;

/// Rows offered to a table and rows it actually accepted.
///
/// Customers, products and invoices are offered as distinct tuples; line
/// items are offered one per record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCount {
    pub offered: usize,
    pub inserted: usize,
}

/// Per-table outcome of a relational load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub customers: TableCount,
    pub products: TableCount,
    pub invoices: TableCount,
    pub items: TableCount,
}

/// Tuples extracted from the records, in first-seen order.
#[derive(Debug, Default)]
pub struct NormalizedRows<'a> {
    pub customers: Vec<(&'a str, &'a str)>,
    pub products: Vec<(&'a str, &'a str)>,
    pub invoices: Vec<(&'a str, &'a str, &'a str)>,
    pub items: Vec<(&'a str, &'a str, i64, f64)>,
}

impl<'a> NormalizedRows<'a> {
    /// Split records into table rows. Customer, product and invoice tuples
    /// are de-duplicated; line items are kept as-is.
    pub fn from_records(records: &'a [RetailRecord]) -> Self {
        let customers = distinct(records.iter().map(|r| (r.customer_id.as_str(), r.country.as_str())));
        let products = distinct(records.iter().map(|r| (r.stock_code.as_str(), r.description.as_str())));
        let invoices = distinct(records.iter().map(|r| {
            (r.invoice_no.as_str(), r.invoice_date.as_str(), r.customer_id.as_str())
        }));
        let items = records
            .iter()
            .map(|r| (r.invoice_no.as_str(), r.stock_code.as_str(), r.quantity, r.unit_price))
            .collect();

        Self {
            customers,
            products,
            invoices,
            items,
        }
    }
}

fn distinct<T: Eq + Hash + Copy>(rows: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    rows.filter(|row| seen.insert(*row)).collect()
}

/// Insert records in one transaction using `INSERT OR IGNORE`.
pub fn insert_records(conn: &mut Connection, records: &[RetailRecord]) -> rusqlite::Result<LoadSummary> {
    let rows = NormalizedRows::from_records(records);
    let tx = conn.transaction()?;
    let mut summary = LoadSummary::default();

    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO Customer (CustomerID, Country) VALUES (?1, ?2)")?;
        summary.customers.offered = rows.customers.len();
        for (id, country) in &rows.customers {
            summary.customers.inserted += stmt.execute(params![id, country])?;
        }

        let mut stmt = tx.prepare("INSERT OR IGNORE INTO Product (StockCode, Description) VALUES (?1, ?2)")?;
        summary.products.offered = rows.products.len();
        for (code, description) in &rows.products {
            summary.products.inserted += stmt.execute(params![code, description])?;
        }

        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO Invoice (InvoiceNo, InvoiceDate, CustomerID) VALUES (?1, ?2, ?3)",
        )?;
        summary.invoices.offered = rows.invoices.len();
        for (invoice_no, date, customer_id) in &rows.invoices {
            summary.invoices.inserted += stmt.execute(params![invoice_no, date, customer_id])?;
        }

        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO InvoiceItem (InvoiceNo, StockCode, Quantity, UnitPrice) VALUES (?1, ?2, ?3, ?4)",
        )?;
        summary.items.offered = rows.items.len();
        for (invoice_no, code, quantity, price) in &rows.items {
            summary.items.inserted += stmt.execute(params![invoice_no, code, quantity, price])?;
        }
    }

    tx.commit()?;

    metrics::record_rows_loaded("customer", summary.customers.inserted);
    metrics::record_rows_loaded("product", summary.products.inserted);
    metrics::record_rows_loaded("invoice", summary.invoices.inserted);
    metrics::record_rows_loaded("invoice_item", summary.items.inserted);

    tracing::info!(
        customers = summary.customers.offered,
        products = summary.products.offered,
        invoices = summary.invoices.offered,
        items_inserted = summary.items.inserted,
        "SQL data load complete"
    );
    Ok(summary)
}

/// Row count of one of the schema tables.
pub fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relational::schema::{open_in_memory, setup_schema};

    fn record(invoice: &str, code: &str, customer: &str) -> RetailRecord {
        RetailRecord {
            invoice_no: invoice.to_string(),
            stock_code: code.to_string(),
            description: format!("item {code}"),
            quantity: 2,
            invoice_date: "12/1/2010 8:26".to_string(),
            unit_price: 1.25,
            customer_id: customer.to_string(),
            country: "United Kingdom".to_string(),
        }
    }

    #[test]
    fn test_normalized_rows_keep_first_seen_order() {
        let records = vec![record("2", "B", "c2"), record("1", "A", "c1"), record("2", "B", "c2")];
        let rows = NormalizedRows::from_records(&records);
        assert_eq!(rows.customers, vec![("c2", "United Kingdom"), ("c1", "United Kingdom")]);
        assert_eq!(rows.invoices.len(), 2);
        assert_eq!(rows.items.len(), 3);
    }

    #[test]
    fn test_duplicate_item_is_ignored() {
        let mut conn = open_in_memory().unwrap();
        setup_schema(&conn).unwrap();

        let records = vec![record("1", "A", "c1"), record("1", "A", "c1")];
        let summary = insert_records(&mut conn, &records).unwrap();
        assert_eq!(summary.items, TableCount { offered: 2, inserted: 1 });
        assert_eq!(count_rows(&conn, "InvoiceItem").unwrap(), 1);
    }

    #[test]
    fn test_second_load_inserts_nothing() {
        let mut conn = open_in_memory().unwrap();
        setup_schema(&conn).unwrap();

        let records = vec![record("1", "A", "c1"), record("2", "B", "c2")];
        insert_records(&mut conn, &records).unwrap();
        let again = insert_records(&mut conn, &records).unwrap();

        assert_eq!(again.customers, TableCount { offered: 2, inserted: 0 });
        assert_eq!(again.invoices.inserted, 0);
        assert_eq!(count_rows(&conn, "Invoice").unwrap(), 2);
    }
}
