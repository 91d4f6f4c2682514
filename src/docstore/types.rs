//! Store errors and their retry classification.

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

use crate::resilience::Transient;

/// Server error code for unique index violations.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Errors that can occur while writing documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver-level failure (network, server selection, write errors).
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Document could not be converted to BSON.
    #[error("BSON serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    /// A document with the same `_id` already exists.
    #[error("Duplicate key in {collection}: {key}")]
    DuplicateKey { collection: String, key: String },

    /// The store could not be reached; expected to clear on retry.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True for primary-key / unique-key violations.
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            StoreError::DuplicateKey { .. } => true,
            StoreError::Mongo(err) => is_duplicate_key_error(err),
            _ => false,
        }
    }
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        match self {
            StoreError::Mongo(err) => err.is_transient(),
            StoreError::Unavailable(_) => true,
            _ => false,
        }
    }
}

/// Server codes for a replica-set state change (stepdown, not primary,
/// node recovering).
pub const STATE_CHANGE_CODES: [i32; 8] = [189, 91, 10107, 11600, 11602, 13435, 13436, 10058];

pub fn is_state_change_code(code: i32) -> bool {
    STATE_CHANGE_CODES.contains(&code)
}

/// Lost connections, server selection timeouts, cleared pools and primary
/// stepdowns are transient; everything else is permanent.
impl Transient for mongodb::error::Error {
    fn is_transient(&self) -> bool {
        match &*self.kind {
            ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } | ErrorKind::ConnectionPoolCleared { .. } => true,
            ErrorKind::Command(e) => is_state_change_code(e.code),
            _ => false,
        }
    }
}

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|w| w.code == DUPLICATE_KEY_CODE)),
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let dup = StoreError::DuplicateKey {
            collection: "invoices".to_string(),
            key: "536365".to_string(),
        };
        assert!(dup.is_duplicate_key());
        assert!(!dup.is_transient());

        let down = StoreError::Unavailable("connection reset".to_string());
        assert!(down.is_transient());
        assert!(!down.is_duplicate_key());
    }

    #[test]
    fn test_io_error_is_transient() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = StoreError::Mongo(mongodb::error::Error::from(io));
        assert!(err.is_transient());
    }

    #[test]
    fn test_state_change_codes() {
        // NotWritablePrimary, NotPrimaryNoSecondaryOk, InterruptedDueToReplStateChange
        for code in [10107, 13435, 11602] {
            assert!(is_state_change_code(code), "{code}");
        }
        assert!(!is_state_change_code(DUPLICATE_KEY_CODE));
        assert!(!is_state_change_code(2));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::DuplicateKey {
            collection: "invoices".to_string(),
            key: "536365".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate key in invoices: 536365");
    }
}
