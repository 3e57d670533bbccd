//! Typed configuration loading from `~/.codemate/config.json`.
//!
//! The file holds a [`ClientConfig`] under the `llm` key. Loading is glue:
//! all real policy (defaulting, provider dispatch) lives in [`crate::client`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;
use crate::error::Error;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: ClientConfig,
}

impl Config {
    /// Load configuration from the default path, or defaults when the file
    /// does not exist.
    pub fn load() -> Result<Self, Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Configuration(format!("invalid config {}: {e}", path.display())))
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codemate")
            .join("config.json")
    }

    /// Write the default config template to disk.
    pub fn write_default_template() -> Result<PathBuf, Error> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Configuration(format!("cannot create config dir: {e}")))?;
        }

        let template = serde_json::json!({
            "llm": {
                "provider": "claude",
                "apiKey": "sk-ant-YOUR_KEY_HERE",
                "maxTokens": 1024,
                "temperature": 0.7
            }
        });
        let rendered = serde_json::to_string_pretty(&template)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        std::fs::write(&path, rendered)
            .map_err(|e| Error::Configuration(format!("cannot write {}: {e}", path.display())))?;
        Ok(path)
    }

    /// Collect human-readable problems with this configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.llm.api_key.is_empty() {
            errors.push("llm.apiKey is empty".to_string());
        }
        if self.llm.provider.parse::<crate::client::ProviderKind>().is_err() {
            errors.push(format!(
                "llm.provider {:?} is not one of: claude, openai",
                self.llm.provider
            ));
        }
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            errors.push(format!(
                "llm.temperature {} is outside 0.0–1.0",
                self.llm.temperature
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
