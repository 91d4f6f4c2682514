//! Retail transactions source data.
//!
//! # Data Flow
//! ```text
//! online_retail.csv
//!     → reader.rs (first target * overfetch rows, lenient decoding)
//!     → record.rs (drop rows missing keys, parse numerics)
//!     → Vec<RetailRecord> for the relational and document loaders
//! ```

pub mod reader;
pub mod record;

use thiserror::Error;

pub use reader::{load_raw_records, load_records, read_raw_records};
pub use record::{clean_records, RawRecord, RetailRecord};

/// Errors reading the source file.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source file does not exist. Fatal for every loader.
    #[error("Source data file not found: {0}")]
    NotFound(String),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
