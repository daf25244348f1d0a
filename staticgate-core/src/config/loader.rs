//! Configuration loader

use crate::config::StaticGateConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration loader for JSON and TOML files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, picking the format by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<StaticGateConfig> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        tracing::debug!(path = %path.display(), format = ext, "loading configuration");

        let content = std::fs::read_to_string(path)?;

        match ext {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(Error::Config(format!("Unknown config format: {:?}", ext))),
        }
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<StaticGateConfig> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<StaticGateConfig> {
        Ok(toml::from_str(content)?)
    }

    /// Render configuration as pretty JSON
    pub fn to_json(config: &StaticGateConfig) -> Result<String> {
        Ok(serde_json::to_string_pretty(config)?)
    }
}
