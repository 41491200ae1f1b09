//! Console extension options

use std::fmt;
use std::fs;
use std::path::Path;

use cmdwire_console::UNKNOWN;
use serde::Deserialize;

use crate::error::{ExtensionError, Message, Result};

/// Tag used to discover commands when discovery is tag based but no tag is
/// configured
pub const DEFAULT_COMMAND_TAG: &str = "console.command";

/// Options of a console extension
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Application name
    pub name: Option<String>,
    /// Application version, a string or a number
    pub version: Option<Version>,
    /// Render command errors instead of propagating them
    pub catch_exceptions: bool,
    pub di: DiConfig,
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiConfig {
    pub parameters: DiParametersConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiParametersConfig {
    /// Keep a copy of build-time parameters for `di:parameters`
    pub backup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Tag marking command services; `None` discovers commands by type
    pub tag: Option<String>,
}

/// Application version as written in configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Version {
    String(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::String(version) => f.write_str(version),
            Version::Int(version) => write!(f, "{}", version),
            Version::Float(version) => write!(f, "{}", version),
        }
    }
}

impl ConsoleConfig {
    /// Load options from a `.yaml`, `.yml` or `.json` file and validate them
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ExtensionError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        let config: ConsoleConfig = match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ExtensionError::Config(
                    "Unsupported file format. Use .yaml, .yml, or .json".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the schema alone cannot rule out
    pub fn validate(&self) -> Result<()> {
        if let Some(tag) = &self.discovery.tag {
            if tag.trim().is_empty() {
                return Err(ExtensionError::InvalidArgument(
                    Message::new(
                        "Option 'discovery > tag' is set.",
                        "Tag name is empty.",
                    )
                    .with_solution("Use a non-empty tag name or null to discover commands by type."),
                ));
            }
        }

        if self.name.as_deref().is_some_and(str::is_empty) {
            return Err(ExtensionError::InvalidArgument(
                Message::new("Option 'name' is set.", "Application name is empty.")
                    .with_solution("Use a non-empty name or null."),
            ));
        }

        if let Some(Version::Float(version)) = self.version {
            if !version.is_finite() {
                return Err(ExtensionError::InvalidArgument(Message::new(
                    "Option 'version' is set.",
                    format!("Version {} is not a finite number.", version),
                )));
            }
        }

        Ok(())
    }

    /// Tag that marks commands and is attached to built-in commands
    pub fn command_tag(&self) -> &str {
        self.discovery.tag.as_deref().unwrap_or(DEFAULT_COMMAND_TAG)
    }

    pub fn application_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn application_version(&self) -> String {
        self.version
            .as_ref()
            .map_or_else(|| UNKNOWN.to_string(), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: ConsoleConfig = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.command_tag(), DEFAULT_COMMAND_TAG);
        assert_eq!(config.application_name(), "UNKNOWN");
        assert_eq!(config.application_version(), "UNKNOWN");
        assert!(!config.di.parameters.backup);
    }

    #[test]
    fn test_version_forms() {
        let config: ConsoleConfig = serde_yaml::from_str("version: 2").unwrap();
        assert_eq!(config.application_version(), "2");

        let config: ConsoleConfig = serde_yaml::from_str("version: 1.5").unwrap();
        assert_eq!(config.application_version(), "1.5");

        let config: ConsoleConfig = serde_yaml::from_str("version: 1.0.0-beta").unwrap();
        assert_eq!(config.application_version(), "1.0.0-beta");
    }

    #[test]
    fn test_unknown_option_rejected() {
        let result: std::result::Result<ConsoleConfig, _> = serde_yaml::from_str("autoExit: true");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_tag() {
        let config: ConsoleConfig = serde_yaml::from_str("discovery:\n  tag: ''").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ExtensionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_validate_rejects_infinite_version() {
        let config = ConsoleConfig {
            version: Some(Version::Float(f64::INFINITY)),
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
