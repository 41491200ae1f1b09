// Configuration file of the cmdwire binary

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use cmdwire_di::Parameters;
use cmdwire_extension::ConsoleConfig;
use serde::Deserialize;

/// Top-level configuration file
///
/// ```yaml
/// console:
///   name: Demo
/// parameters:
///   debugMode: true
/// export_parameters: true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Options of the console extension
    pub console: ConsoleConfig,
    /// Container parameters
    pub parameters: Parameters,
    /// Export parameters into the compiled container
    pub export_parameters: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            parameters: Parameters::new(),
            export_parameters: true,
        }
    }
}

impl CliConfig {
    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: CliConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?,
            _ => bail!(
                "Unsupported config format for {}. Use .yaml, .yml, or .json",
                path.display()
            ),
        };

        config.console.validate()?;
        Ok(config)
    }
}
