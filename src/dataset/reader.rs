//! Bounded CSV reading.
//!
//! Fields are decoded as UTF-8 when valid and as Latin-1 otherwise, so rows
//! with stray single-byte characters are kept instead of rejected.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, StringRecord};

use crate::dataset::record::{clean_records, RawRecord, RetailRecord};
use crate::dataset::DatasetError;

/// Read at most `limit` data rows from any CSV source with a header line.
pub fn read_raw_records<R: Read>(source: R, limit: usize) -> Result<Vec<RawRecord>, DatasetError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = decode_record(reader.byte_headers()?);

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    while rows.len() < limit && reader.read_byte_record(&mut record)? {
        let decoded = decode_record(&record);
        rows.push(decoded.deserialize(Some(&headers))?);
    }
    Ok(rows)
}

/// Read at most `limit` data rows from the CSV file at `path`.
pub fn load_raw_records(path: &Path, limit: usize) -> Result<Vec<RawRecord>, DatasetError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound(path.display().to_string())
        } else {
            DatasetError::Io {
                path: path.display().to_string(),
                source,
            }
        }
    })?;

    let rows = read_raw_records(file, limit)?;
    tracing::debug!(path = %path.display(), limit, rows = rows.len(), "Source rows read");
    Ok(rows)
}

/// Read `limit` raw rows and keep the usable ones.
pub fn load_records(path: &Path, limit: usize) -> Result<Vec<RetailRecord>, DatasetError> {
    let raw = load_raw_records(path, limit)?;
    let records = clean_records(&raw);
    tracing::info!(
        raw_rows = raw.len(),
        usable_rows = records.len(),
        dropped = raw.len() - records.len(),
        "Source data loaded"
    );
    Ok(records)
}

fn decode_record(record: &ByteRecord) -> StringRecord {
    record.iter().map(decode_field).collect()
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n";

    #[test]
    fn test_limit_is_respected() {
        let mut csv = HEADER.to_string();
        for i in 0..10 {
            csv.push_str(&format!("5363{i},85123A,HEART,6,12/1/2010 8:26,2.55,17850,United Kingdom\n"));
        }
        let rows = read_raw_records(csv.as_bytes(), 4).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].invoice_no.as_deref(), Some("53633"));
    }

    #[test]
    fn test_empty_fields_are_none() {
        let csv = format!("{HEADER}536365,85123A,HEART,6,12/1/2010 8:26,2.55,,United Kingdom\n");
        let rows = read_raw_records(csv.as_bytes(), 10).unwrap();
        assert_eq!(rows[0].customer_id, None);
        assert_eq!(rows[0].country.as_deref(), Some("United Kingdom"));
    }

    #[test]
    fn test_latin1_fallback() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"536365,22,CAF\xC9 SIGN,1,12/1/2010 8:26,1.0,12,France\n");
        let rows = read_raw_records(bytes.as_slice(), 10).unwrap();
        assert_eq!(rows[0].description.as_deref(), Some("CAF\u{C9} SIGN"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_raw_records(Path::new("/nonexistent/online_retail.csv"), 10).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }
}
