//! Buildpack configuration
//!
//! Settings are read from `BP_*` environment variables set by the platform.
//!
//! - `BP_SPRING_CLOUD_BINDINGS_DISABLED`: skip the helper and bindings layers
//!   (true|false) - default: "false"
//! - `BP_SPRING_CLOUD_BINDINGS_VERSION`: version of Spring Cloud Bindings to
//!   contribute, exact or with a trailing `*` - default: "*"
//! - `BP_LOG_LEVEL`: logging level - default: "info"

use crate::buildpack::VersionConstraint;
use std::env;
use thiserror::Error;

pub const BINDINGS_DISABLED_ENV: &str = "BP_SPRING_CLOUD_BINDINGS_DISABLED";
pub const BINDINGS_VERSION_ENV: &str = "BP_SPRING_CLOUD_BINDINGS_VERSION";
pub const LOG_LEVEL_ENV: &str = "BP_LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildpackConfig {
    pub bindings_disabled: bool,
    pub bindings_version: VersionConstraint,
    pub log_level: String,
}

impl Default for BuildpackConfig {
    fn default() -> Self {
        Self {
            bindings_disabled: false,
            bindings_version: VersionConstraint::any(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl BuildpackConfig {
    /// Load and validate configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bindings_disabled = match non_empty_var(BINDINGS_DISABLED_ENV) {
            Some(value) => parse_bool(BINDINGS_DISABLED_ENV, &value)?,
            None => defaults.bindings_disabled,
        };

        let bindings_version = non_empty_var(BINDINGS_VERSION_ENV)
            .map(VersionConstraint::new)
            .unwrap_or(defaults.bindings_version);

        let log_level = non_empty_var(LOG_LEVEL_ENV)
            .map(|v| v.to_lowercase())
            .unwrap_or(defaults.log_level);

        let config = Self {
            bindings_disabled,
            bindings_version,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level '{}'. Valid levels: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        let version = self.bindings_version.as_str();
        if version.trim().is_empty() || version.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid {} '{}'",
                BINDINGS_VERSION_ENV, version
            )));
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        other => Err(ConfigError::ParseError {
            field: field.to_string(),
            error: format!("'{}' is not a boolean", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var(BINDINGS_DISABLED_ENV);
        env::remove_var(BINDINGS_VERSION_ENV);
        env::remove_var(LOG_LEVEL_ENV);
    }

    #[test]
    fn test_default_config() {
        let config = BuildpackConfig::default();

        assert!(!config.bindings_disabled);
        assert_eq!(config.bindings_version, VersionConstraint::any());
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = BuildpackConfig::from_env().unwrap();
        assert_eq!(config, BuildpackConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var(BINDINGS_DISABLED_ENV, "TRUE");
        env::set_var(BINDINGS_VERSION_ENV, "1.*");
        env::set_var(LOG_LEVEL_ENV, "DEBUG");

        let config = BuildpackConfig::from_env().unwrap();
        clear_env();

        assert!(config.bindings_disabled);
        assert_eq!(config.bindings_version.as_str(), "1.*");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_bool() {
        clear_env();
        env::set_var(BINDINGS_DISABLED_ENV, "maybe");

        let result = BuildpackConfig::from_env();
        clear_env();

        match result {
            Err(ConfigError::ParseError { field, .. }) => {
                assert_eq!(field, BINDINGS_DISABLED_ENV);
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_log_level() {
        clear_env();
        env::set_var(LOG_LEVEL_ENV, "loud");

        let result = BuildpackConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn test_validate_rejects_blank_version() {
        let config = BuildpackConfig {
            bindings_version: VersionConstraint::new("1. 2"),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}
