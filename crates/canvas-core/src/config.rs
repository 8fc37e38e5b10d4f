//! Editor configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Include the module target in log lines
    pub log_target: bool,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&contents)?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded editor config");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(CoreError::Config("log_filter cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_target: true,
        }
    }
}
