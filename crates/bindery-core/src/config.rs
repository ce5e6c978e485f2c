//! Registry configuration
//!
//! Built in code with `RegistryConfig::default()` / `strict()`, or read from a
//! TOML file:
//!
//! ```toml
//! duplicate_class_policy = "error"
//! required_abi = "1.0"
//! notify_host = true
//! ```

use std::path::Path;

use bindery_sdk::AbiVersion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What to do when a class name is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateClassPolicy {
    /// Keep the first registration and log a warning
    #[default]
    Ignore,
    /// Fail with `RegistrationError::DuplicateClass`
    Error,
}

/// Configuration for a `ClassRegistry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Behaviour on repeated class registration (default: ignore)
    pub duplicate_class_policy: DuplicateClassPolicy,
    /// Interface version the host must be compatible with (default: current)
    pub required_abi: AbiVersion,
    /// Forward registrations to the host (default: true)
    pub notify_host: bool,
    /// Convert default arguments to their argument's kind at bind time (default: true)
    pub validate_default_kinds: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            duplicate_class_policy: DuplicateClassPolicy::Ignore,
            required_abi: AbiVersion::CURRENT,
            notify_host: true,
            validate_default_kinds: true,
        }
    }
}

impl RegistryConfig {
    /// Configuration that rejects duplicate classes
    pub fn strict() -> Self {
        RegistryConfig {
            duplicate_class_policy: DuplicateClassPolicy::Error,
            ..Default::default()
        }
    }

    /// Read a configuration file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> String {
        // Every field is a plain scalar, so serialization cannot fail
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.duplicate_class_policy, DuplicateClassPolicy::Ignore);
        assert!(config.notify_host);
        assert!(config.validate_default_kinds);
        assert_eq!(
            RegistryConfig::strict().duplicate_class_policy,
            DuplicateClassPolicy::Error
        );
    }

    #[test]
    fn test_from_toml() {
        let config = RegistryConfig::from_toml_str(
            r#"
            duplicate_class_policy = "error"
            required_abi = "1.2"
            "#,
        )
        .unwrap();
        assert_eq!(config.duplicate_class_policy, DuplicateClassPolicy::Error);
        assert_eq!(config.required_abi, AbiVersion::new(1, 2, 0));
        assert!(config.notify_host);

        assert_eq!(RegistryConfig::from_toml_str("").unwrap(), RegistryConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(matches!(
            RegistryConfig::from_toml_str("required_abi = \"one\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RegistryConfig::from_toml_str("verbose = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RegistryConfig::strict();
        let text = config.to_toml_string();
        assert!(text.contains("required_abi = \"1.0.0\""));
        assert_eq!(RegistryConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_missing_file() {
        let result = RegistryConfig::from_file(Path::new("/nonexistent/bindery.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
