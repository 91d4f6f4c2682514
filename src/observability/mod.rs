//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! loaders, retry wrapper, benchmark:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr/stdout log stream
//!     → optional Prometheus text snapshot file
//! ```

pub mod logging;
pub mod metrics;
