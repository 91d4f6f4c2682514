//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges. All errors are
//! collected rather than stopping at the first one.

use std::fmt;

use crate::config::schema::RetailConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `retry.backoff`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &RetailConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.data.csv_path.trim().is_empty() {
        errors.push(ValidationError::new("data.csv_path", "must not be empty"));
    }
    if config.data.sql_overfetch == 0 {
        errors.push(ValidationError::new("data.sql_overfetch", "must be at least 1"));
    }
    if config.data.document_overfetch == 0 {
        errors.push(ValidationError::new("data.document_overfetch", "must be at least 1"));
    }
    if config.data.progress_every == 0 {
        errors.push(ValidationError::new("data.progress_every", "must be at least 1"));
    }
    if config.sqlite.path.trim().is_empty() {
        errors.push(ValidationError::new("sqlite.path", "must not be empty"));
    }
    if config.mongo.database.trim().is_empty() {
        errors.push(ValidationError::new("mongo.database", "must not be empty"));
    }
    if config.mongo.min_pool_size > config.mongo.max_pool_size {
        errors.push(ValidationError::new(
            "mongo.min_pool_size",
            format!(
                "{} exceeds max_pool_size {}",
                config.mongo.min_pool_size, config.mongo.max_pool_size
            ),
        ));
    }
    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::new("retry.max_attempts", "must be at least 1"));
    }
    if !config.retry.backoff.is_finite() || config.retry.backoff < 1.0 {
        errors.push(ValidationError::new(
            "retry.backoff",
            format!("must be a finite value >= 1.0, got {}", config.retry.backoff),
        ));
    }
    if config.benchmark.num_iter == 0 {
        errors.push(ValidationError::new("benchmark.num_iter", "must be at least 1"));
    }
    if config.benchmark.id_scan_limit <= 0 {
        errors.push(ValidationError::new("benchmark.id_scan_limit", "must be positive"));
    }
    if config.benchmark.results_path.trim().is_empty() {
        errors.push(ValidationError::new("benchmark.results_path", "must not be empty"));
    }
    if config.cluster.output_path.trim().is_empty() {
        errors.push(ValidationError::new("cluster.output_path", "must not be empty"));
    }
    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RetailConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RetailConfig::default();
        config.retry.max_attempts = 0;
        config.retry.backoff = 0.5;
        config.data.document_overfetch = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "data.document_overfetch",
                "retry.max_attempts",
                "retry.backoff",
                "observability.log_level",
            ]
        );
    }

    #[test]
    fn test_pool_bounds() {
        let mut config = RetailConfig::default();
        config.mongo.min_pool_size = 200;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("exceeds max_pool_size 100"));
    }
}
