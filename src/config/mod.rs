//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MONGO_URI override
//!     → RetailConfig (validated, immutable)
//!     → passed by reference to each command
//! ```
//!
//! # Design Decisions
//! - All fields have defaults, so running without a file uses the fixed
//!   dataset constants (1000 records, 2x/3x over-fetch, seed 42)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BenchmarkConfig, ClusterConfig, CollectionNames, DataConfig, MongoConfig,
    ObservabilityConfig, RetailConfig, RetryConfig, SqliteConfig, MONGO_URI_ENV,
};
