//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RetailConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
///
/// The `MONGO_URI` override is not applied here so the result depends only
/// on the input.
pub fn parse_config(content: &str) -> Result<RetailConfig, ConfigError> {
    let config: RetailConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from an optional TOML file.
///
/// Without a path the built-in defaults are used. In both cases the
/// `MONGO_URI` environment variable overrides `mongo.uri`.
pub fn load_config(path: Option<&Path>) -> Result<RetailConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_config(&content)?
        }
        None => RetailConfig::default(),
    };

    config.mongo.apply_env();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sqlite]\npath = \"bench.db\"\n[retry]\nbase_delay_ms = 50").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.sqlite.path, "bench.db");
        assert_eq!(config.retry.base_delay_ms, 50);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/retail.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/retail.toml"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = parse_config("[retry]\nmax_attempts = 0\nbackoff = 0.0").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("retry.max_attempts"));
        assert!(message.contains("retry.backoff"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[retry\nmax_attempts = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
