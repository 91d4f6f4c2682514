//! SQLite benchmark operations.

use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::{params, Connection};

use crate::bench::results::BenchResults;
use crate::bench::{time_sync, unique_suffix};

const SYSTEM: &str = "sqlite";

/// Placeholder customer and product referenced by benchmark inserts, so the
/// inserts satisfy the foreign keys.
pub const BENCH_CUSTOMER: &str = "0";
pub const BENCH_PRODUCT: &str = "SAMPLE";

/// Up to `k` invoice numbers sampled without replacement.
pub fn sample_invoice_numbers<R: Rng>(conn: &Connection, k: usize, rng: &mut R) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT InvoiceNo FROM Invoice")?;
    let all: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    Ok(all.choose_multiple(rng, k.min(all.len())).cloned().collect())
}

/// Make sure the placeholder customer and product exist.
pub fn ensure_fixtures(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO Customer (CustomerID, Country) VALUES (?1, 'XX')",
        params![BENCH_CUSTOMER],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO Product (StockCode, Description) VALUES (?1, 'benchmark sample')",
        params![BENCH_PRODUCT],
    )?;
    Ok(())
}

/// Invoice joined with its items. Returns the row count.
pub fn read_invoice(conn: &Connection, invoice_no: &str) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare_cached(
        "SELECT Invoice.InvoiceNo, Invoice.InvoiceDate, Invoice.CustomerID, \
                InvoiceItem.StockCode, InvoiceItem.Quantity, InvoiceItem.UnitPrice \
         FROM Invoice LEFT JOIN InvoiceItem ON Invoice.InvoiceNo = InvoiceItem.InvoiceNo \
         WHERE Invoice.InvoiceNo = ?1",
    )?;
    let mut rows = stmt.query(params![invoice_no])?;
    let mut count = 0;
    while rows.next()?.is_some() {
        count += 1;
    }
    Ok(count)
}

/// Insert an invoice with one sample item, atomically.
pub fn insert_invoice(conn: &Connection, invoice_no: &str) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT OR IGNORE INTO Invoice (InvoiceNo, InvoiceDate, CustomerID) VALUES (?1, datetime('now'), ?2)",
        params![invoice_no, BENCH_CUSTOMER],
    )?;
    tx.execute(
        "INSERT OR IGNORE INTO InvoiceItem (InvoiceNo, StockCode, Quantity, UnitPrice) VALUES (?1, ?2, 1, 1.0)",
        params![invoice_no, BENCH_PRODUCT],
    )?;
    tx.commit()
}

/// Increment every item quantity of an invoice. Returns rows changed.
pub fn update_items(conn: &Connection, invoice_no: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE InvoiceItem SET Quantity = Quantity + 1 WHERE InvoiceNo = ?1",
        params![invoice_no],
    )
}

/// Delete an invoice and its items, atomically.
pub fn delete_invoice(conn: &Connection, invoice_no: &str) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM InvoiceItem WHERE InvoiceNo = ?1", params![invoice_no])?;
    tx.execute("DELETE FROM Invoice WHERE InvoiceNo = ?1", params![invoice_no])?;
    tx.commit()
}

/// Phase-by-phase SQLite benchmark state.
pub struct SqliteBench<'a> {
    conn: &'a Connection,
    invoice_ids: Vec<String>,
    created: Vec<String>,
}

impl<'a> SqliteBench<'a> {
    pub fn new<R: Rng>(conn: &'a Connection, num_iter: usize, rng: &mut R) -> rusqlite::Result<Self> {
        ensure_fixtures(conn)?;
        let invoice_ids = sample_invoice_numbers(conn, num_iter, rng)?;
        tracing::debug!(sampled = invoice_ids.len(), "SQLite invoice ids sampled");
        Ok(Self {
            conn,
            invoice_ids,
            created: Vec::new(),
        })
    }

    pub fn sampled(&self) -> &[String] {
        &self.invoice_ids
    }

    pub fn read_phase(&self, results: &mut BenchResults) {
        for invoice_no in &self.invoice_ids {
            match time_sync(|| read_invoice(self.conn, invoice_no)) {
                Ok(t) => results.push(SYSTEM, "read_invoice", t),
                Err(e) => results.record_failure(SYSTEM, "read_invoice", &e),
            }
        }
    }

    pub fn insert_phase(&mut self, count: usize, results: &mut BenchResults) {
        for i in 0..count {
            let invoice_no = format!("NEW_SQL_{i}_{}", unique_suffix());
            match time_sync(|| insert_invoice(self.conn, &invoice_no)) {
                Ok(t) => {
                    results.push(SYSTEM, "insert_invoice", t);
                    self.created.push(invoice_no);
                }
                Err(e) => results.record_failure(SYSTEM, "insert_invoice", &e),
            }
        }
    }

    pub fn update_phase(&self, count: usize, results: &mut BenchResults) {
        for invoice_no in self.invoice_ids.iter().take(count) {
            match time_sync(|| update_items(self.conn, invoice_no)) {
                Ok(t) => results.push(SYSTEM, "update_item", t),
                Err(e) => results.record_failure(SYSTEM, "update_item", &e),
            }
        }
    }

    /// Remove what the insert phase created.
    pub fn delete_phase(&mut self, results: &mut BenchResults) {
        for invoice_no in std::mem::take(&mut self.created) {
            match time_sync(|| delete_invoice(self.conn, &invoice_no)) {
                Ok(t) => results.push(SYSTEM, "delete_invoice", t),
                Err(e) => results.record_failure(SYSTEM, "delete_invoice", &e),
            }
        }
    }
}
