//! Retail dataset loader and SQLite / MongoDB CRUD benchmark.

// Source data and relational store
pub mod config;
pub mod dataset;
pub mod relational;

// Document layouts and loaders
pub mod docstore;
pub mod documents;
pub mod ingest;

// Measurements and deployment facts
pub mod bench;
pub mod cluster;

// Cross-cutting concerns
pub mod error;
pub mod observability;
pub mod resilience;

pub mod commands;

pub use config::RetailConfig;
pub use error::RetailError;
