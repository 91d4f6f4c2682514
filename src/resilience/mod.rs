//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Document store call:
//!     → retries.rs (run, classify failure via Transient)
//!     → On transient failure: backoff.rs (next delay), sleep, call again
//!     → On permanent failure or spent budget: error returned to the loader
//! ```

pub mod backoff;
pub mod retries;

pub use retries::{retry, RetryPolicy, Transient};
