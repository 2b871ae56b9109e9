//! Configuration structures for the vo-datalink tools.
//!
//! This module provides configuration types for the components of the
//! workspace:
//!
//! - [`FetchConfig`] - HTTP retrieval of VOTable documents
//! - [`OutputConfig`] - CLI output settings
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] and deserialize with every
//! field optional, so a config file only needs the values it changes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Color scheme for terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColorScheme {
    /// Use colors when the terminal supports them.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Configuration for fetching documents over HTTP.
///
/// # Examples
///
/// ```
/// use vo_core::FetchConfig;
///
/// let config = FetchConfig::default();
/// assert_eq!(config.timeout_secs, Some(30));
/// assert!(config.user_agent.starts_with("vo-datalink/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Largest response body accepted, in bytes.
    pub max_response_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(30),
            user_agent: concat!("vo-datalink/", env!("CARGO_PKG_VERSION")).to_owned(),
            max_response_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Configuration for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Color handling for log output.
    pub color_scheme: ColorScheme,

    /// Emit JSON instead of text.
    pub json: bool,
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use vo_core::Config;
///
/// let config = Config::from_json_str(r#"{"fetch": {"timeout_secs": 5}}"#)?;
/// assert_eq!(config.fetch.timeout_secs, Some(5));
/// assert!(!config.output.json);
/// # Ok::<(), vo_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP retrieval.
    pub fetch: FetchConfig,

    /// CLI output.
    pub output: OutputConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidOption`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the first bad option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == Some(0) {
            return Err(ConfigError::invalid_option(
                "fetch.timeout_secs",
                "must be positive (omit it to disable the timeout)",
            ));
        }
        if self.fetch.max_response_bytes == 0 {
            return Err(ConfigError::invalid_option(
                "fetch.max_response_bytes",
                "must be positive",
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid_option("fetch.user_agent", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.max_response_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let config = Config::from_json_str(r#"{"output": {"json": true}}"#).unwrap();
        assert!(config.output.json);
        assert_eq!(config.output.color_scheme, ColorScheme::Auto);
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn test_null_timeout_disables_it() {
        let config = Config::from_json_str(r#"{"fetch": {"timeout_secs": null}}"#).unwrap();
        assert_eq!(config.fetch.timeout_secs, None);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let err = Config::from_json_str(r#"{"fetch": {"timeout_secs": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("fetch.timeout_secs"));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_color_scheme_serialization() {
        assert_eq!(
            serde_json::to_string(&ColorScheme::Never).unwrap(),
            r#""never""#
        );
    }
}
