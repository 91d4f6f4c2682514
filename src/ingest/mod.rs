//! Document loaders.
//!
//! # Data Flow
//! ```text
//! Vec<RetailRecord>
//!     → group_by_invoice
//!     → per invoice: build document → retry(store call)
//!         → Ok: count, progress log every N
//!         → Err: log with key, record failure, continue
//!     → IngestReport
//! ```

pub mod customer_centric;
pub mod report;
pub mod transactional;

pub use customer_centric::load_customer_centric;
pub use report::{IngestFailure, IngestReport};
pub use transactional::load_transactional;

use crate::config::RetailConfig;
use crate::resilience::RetryPolicy;

/// Knobs shared by both loaders.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Stop after this many successful invoices.
    pub target: usize,
    /// Progress log interval. Zero is treated as one.
    pub progress_every: usize,
    pub policy: RetryPolicy,
}

impl IngestSettings {
    pub fn from_config(config: &RetailConfig) -> Self {
        Self {
            target: config.data.document_invoices,
            progress_every: config.data.progress_every.max(1),
            policy: RetryPolicy::from(&config.retry),
        }
    }
}
