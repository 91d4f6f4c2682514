//! Normalized four-table schema.

use std::path::Path;

use rusqlite::Connection;

/// DDL for Customer, Product, Invoice and InvoiceItem.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS Customer (
    CustomerID TEXT PRIMARY KEY,
    Country TEXT
);

CREATE TABLE IF NOT EXISTS Product (
    StockCode TEXT PRIMARY KEY,
    Description TEXT
);

CREATE TABLE IF NOT EXISTS Invoice (
    InvoiceNo TEXT PRIMARY KEY,
    InvoiceDate TEXT,
    CustomerID TEXT,
    FOREIGN KEY (CustomerID) REFERENCES Customer (CustomerID)
);

CREATE TABLE IF NOT EXISTS InvoiceItem (
    InvoiceNo TEXT,
    StockCode TEXT,
    Quantity INTEGER,
    UnitPrice REAL,
    PRIMARY KEY (InvoiceNo, StockCode),
    FOREIGN KEY (InvoiceNo) REFERENCES Invoice (InvoiceNo),
    FOREIGN KEY (StockCode) REFERENCES Product (StockCode)
);
";

/// Open (or create) the database file with foreign keys enforced.
pub fn open_database(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    tracing::debug!(path = %path.display(), "SQLite database opened");
    Ok(conn)
}

/// In-memory database with foreign keys enforced.
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(conn)
}

/// Create the tables if they don't exist.
pub fn setup_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_is_repeatable() {
        let conn = open_in_memory().unwrap();
        setup_schema(&conn).unwrap();
        setup_schema(&conn).unwrap();

        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(tables, vec!["Customer", "Invoice", "InvoiceItem", "Product"]);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let conn = open_in_memory().unwrap();
        setup_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO Invoice (InvoiceNo, InvoiceDate, CustomerID) VALUES ('1', 'now', 'missing')",
            [],
        );
        assert!(result.is_err());
    }
}
