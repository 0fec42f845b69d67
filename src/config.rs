//! Configuration management for partialgen
//!
//! Settings are loaded from environment variables with defaults matching the
//! conventional Sass layout (`src/scss/**/__all.scss`, `_`-prefixed
//! `.scss` partials). Command-line flags override these per invocation.
//!
//! # Environment Variables
//!
//! - `PARTIALGEN_PATTERN`: Glob selecting manifest files - default: "src/scss/**/__all.scss"
//! - `PARTIALGEN_MARKER`: Leading character of partial file names - default: "_"
//! - `PARTIALGEN_EXTENSION`: Partial extension, with dot - default: ".scss"
//! - `PARTIALGEN_MANIFEST_NAME`: Generated manifest file name - default: "__all.scss"
//! - `PARTIALGEN_ORDER`: Import ordering (sorted|filesystem) - default: "sorted"
//! - `PARTIALGEN_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use partialgen::PartialgenConfig;
//!
//! let config = PartialgenConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! let aggregator_config = config.aggregator_config().unwrap();
//! assert_eq!(aggregator_config.marker, '_');
//! ```

use crate::aggregator::{
    AggregatorConfig, PartialOrdering, DEFAULT_EXTENSION, DEFAULT_MANIFEST_NAME, DEFAULT_MARKER,
};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_PATTERN: &str = "src/scss/**/__all.scss";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ORDER: &str = "sorted";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone)]
pub struct PartialgenConfig {
    /// Glob selecting manifest files
    pub pattern: String,
    pub marker: String,
    pub extension: String,
    pub manifest_name: String,
    /// `sorted` or `filesystem`
    pub ordering: String,
    pub log_level: String,
}

impl Default for PartialgenConfig {
    fn default() -> Self {
        let pattern =
            env::var("PARTIALGEN_PATTERN").unwrap_or_else(|_| DEFAULT_PATTERN.to_string());

        let marker =
            env::var("PARTIALGEN_MARKER").unwrap_or_else(|_| DEFAULT_MARKER.to_string());

        let extension =
            env::var("PARTIALGEN_EXTENSION").unwrap_or_else(|_| DEFAULT_EXTENSION.to_string());

        let manifest_name = env::var("PARTIALGEN_MANIFEST_NAME")
            .unwrap_or_else(|_| DEFAULT_MANIFEST_NAME.to_string());

        let ordering = env::var("PARTIALGEN_ORDER")
            .unwrap_or_else(|_| DEFAULT_ORDER.to_string())
            .to_lowercase();

        let log_level = env::var("PARTIALGEN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            pattern,
            marker,
            extension,
            manifest_name,
            ordering,
            log_level,
        }
    }
}

impl PartialgenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Manifest pattern cannot be empty".to_string(),
            ));
        }

        if self.marker.chars().count() != 1 {
            return Err(ConfigError::ValidationFailed(format!(
                "Marker must be exactly one character, got '{}'",
                self.marker
            )));
        }

        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(ConfigError::ValidationFailed(format!(
                "Extension must start with '.' and name a suffix, got '{}'",
                self.extension
            )));
        }

        if self.manifest_name.is_empty() || self.manifest_name.contains(['/', '\\']) {
            return Err(ConfigError::ValidationFailed(format!(
                "Manifest name must be a plain file name, got '{}'",
                self.manifest_name
            )));
        }

        self.ordering
            .parse::<PartialOrdering>()
            .map_err(|error| ConfigError::ParseError {
                field: "PARTIALGEN_ORDER".to_string(),
                error,
            })?;

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Validates and converts into the settings the aggregator runs with.
    pub fn aggregator_config(&self) -> Result<AggregatorConfig, ConfigError> {
        self.validate()?;

        let marker = self
            .marker
            .chars()
            .next()
            .ok_or_else(|| ConfigError::ValidationFailed("Marker is empty".to_string()))?;
        let ordering = self
            .ordering
            .parse::<PartialOrdering>()
            .map_err(|error| ConfigError::ParseError {
                field: "PARTIALGEN_ORDER".to_string(),
                error,
            })?;

        Ok(AggregatorConfig {
            marker,
            extension: self.extension.clone(),
            manifest_name: self.manifest_name.clone(),
            ordering,
            dry_run: false,
        })
    }

    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("pattern".to_string(), self.pattern.clone());
        map.insert("marker".to_string(), self.marker.clone());
        map.insert("extension".to_string(), self.extension.clone());
        map.insert("manifest_name".to_string(), self.manifest_name.clone());
        map.insert("ordering".to_string(), self.ordering.clone());
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for PartialgenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Partialgen Configuration:")?;
        writeln!(f, "  Pattern: {}", self.pattern)?;
        writeln!(f, "  Marker: {}", self.marker)?;
        writeln!(f, "  Extension: {}", self.extension)?;
        writeln!(f, "  Manifest Name: {}", self.manifest_name)?;
        writeln!(f, "  Ordering: {}", self.ordering)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn valid_config() -> PartialgenConfig {
        PartialgenConfig {
            pattern: DEFAULT_PATTERN.to_string(),
            marker: "_".to_string(),
            extension: ".scss".to_string(),
            manifest_name: "__all.scss".to_string(),
            ordering: "sorted".to_string(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("PARTIALGEN_PATTERN"),
            EnvGuard::unset("PARTIALGEN_MARKER"),
            EnvGuard::unset("PARTIALGEN_EXTENSION"),
            EnvGuard::unset("PARTIALGEN_MANIFEST_NAME"),
            EnvGuard::unset("PARTIALGEN_ORDER"),
            EnvGuard::unset("PARTIALGEN_LOG_LEVEL"),
        ];

        let config = PartialgenConfig::default();

        assert_eq!(config.pattern, DEFAULT_PATTERN);
        assert_eq!(config.marker, "_");
        assert_eq!(config.extension, ".scss");
        assert_eq!(config.manifest_name, "__all.scss");
        assert_eq!(config.ordering, "sorted");
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("PARTIALGEN_PATTERN", "styles/**/_index.sass"),
            EnvGuard::set("PARTIALGEN_MARKER", "~"),
            EnvGuard::set("PARTIALGEN_EXTENSION", ".sass"),
            EnvGuard::set("PARTIALGEN_MANIFEST_NAME", "_index.sass"),
            EnvGuard::set("PARTIALGEN_ORDER", "FILESYSTEM"),
            EnvGuard::set("PARTIALGEN_LOG_LEVEL", "DEBUG"),
        ];

        let config = PartialgenConfig::default();

        assert_eq!(config.pattern, "styles/**/_index.sass");
        assert_eq!(config.marker, "~");
        assert_eq!(config.extension, ".sass");
        assert_eq!(config.manifest_name, "_index.sass");
        assert_eq!(config.ordering, "filesystem");
        assert_eq!(config.log_level, "debug");

        let aggregator = config.aggregator_config().unwrap();
        assert_eq!(aggregator.marker, '~');
        assert_eq!(aggregator.ordering, PartialOrdering::Filesystem);
    }

    #[test]
    fn test_validation_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_multi_char_marker() {
        let mut config = valid_config();
        config.marker = "__".to_string();
        assert!(config.validate().is_err());

        config.marker = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_extension() {
        let mut config = valid_config();
        config.extension = "scss".to_string();
        assert!(config.validate().is_err());

        config.extension = ".".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_manifest_path() {
        let mut config = valid_config();
        config.manifest_name = "nested/__all.scss".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_ordering() {
        let mut config = valid_config();
        config.ordering = "random".to_string();

        match config.validate() {
            Err(ConfigError::ParseError { field, .. }) => assert_eq!(field, "PARTIALGEN_ORDER"),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_invalid_log_level() {
        let mut config = valid_config();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aggregator_config_defaults() {
        let aggregator = valid_config().aggregator_config().unwrap();
        assert_eq!(aggregator.marker, '_');
        assert_eq!(aggregator.extension, ".scss");
        assert_eq!(aggregator.manifest_name, "__all.scss");
        assert_eq!(aggregator.ordering, PartialOrdering::Sorted);
        assert!(!aggregator.dry_run);
    }

    #[test]
    fn test_display_map() {
        let map = valid_config().to_display_map();
        assert_eq!(map.get("pattern").unwrap(), DEFAULT_PATTERN);
        assert_eq!(map.get("ordering").unwrap(), "sorted");
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", valid_config());
        assert!(display.contains("Partialgen Configuration:"));
        assert!(display.contains("Manifest Name: __all.scss"));
    }
}
