//! Filter compiler configuration
//!
//! Limits the compiler enforces on incoming filters, plus logging switches.
//! Every field has a default, so `{}` is a valid configuration file.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{Event, Logger};

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Maximum `$and` / `$or` nesting (default: 32)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum `$in` / `$nin` operand count (default: 1000)
    #[serde(default = "default_max_list_values")]
    pub max_list_values: usize,

    /// Maximum dot-separated segments in a field path (default: 8)
    #[serde(default = "default_max_path_segments")]
    pub max_path_segments: usize,

    /// Log each filter document at TRACE before compiling (default: false)
    #[serde(default)]
    pub log_expressions: bool,
}

fn default_max_depth() -> usize {
    32
}

fn default_max_list_values() -> usize {
    1000
}

fn default_max_path_segments() -> usize {
    8
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_list_values: default_max_list_values(),
            max_path_segments: default_max_path_segments(),
            log_expressions: false,
        }
    }
}

impl FilterConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config: {}", e)))?;

        let config: FilterConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Logger::event(
            Event::ConfigLoaded,
            &[
                ("max_depth", &config.max_depth.to_string()),
                ("max_list_values", &config.max_list_values.to_string()),
                ("max_path_segments", &config.max_path_segments.to_string()),
                ("path", &path.display().to_string()),
            ],
        );

        Ok(config)
    }

    /// Every limit must be greater than zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::new("max_depth must be > 0"));
        }
        if self.max_list_values == 0 {
            return Err(ConfigError::new("max_list_values must be > 0"));
        }
        if self.max_path_segments == 0 {
            return Err(ConfigError::new("max_path_segments must be > 0"));
        }
        Ok(())
    }
}

/// Configuration error (AERO_CONFIG_INVALID, FATAL)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        "AERO_CONFIG_INVALID"
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL] {}: {}", self.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.max_depth, 32);
        assert_eq!(config.max_list_values, 1000);
        assert_eq!(config.max_path_segments, 8);
        assert!(!config.log_expressions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("filter.json");
        fs::write(&path, r#"{"max_depth": 4, "log_expressions": true}"#).unwrap();

        let config = FilterConfig::load(&path).unwrap();
        assert_eq!(config.max_depth, 4);
        assert!(config.log_expressions);
        assert_eq!(config.max_list_values, 1000);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("filter.json");
        fs::write(&path, r#"{"max_list_values": 0}"#).unwrap();

        let err = FilterConfig::load(&path).unwrap_err();
        assert!(err.message().contains("max_list_values"));
        assert!(err.to_string().contains("AERO_CONFIG_INVALID"));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FilterConfig::load(&temp_dir.path().join("absent.json")).is_err());
    }
}
