use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default payload limit: 5 MiB.
pub const DEFAULT_MAX_DATA_SIZE: u64 = 5 * 1024 * 1024;

/// Configuration for a [`Fragments`](crate::Fragments) repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentsConfig {
    /// Largest payload a data write accepts, in bytes.
    pub max_data_size: u64,
    /// Owner used by local tools when none is given.
    pub default_owner: String,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        Self {
            max_data_size: DEFAULT_MAX_DATA_SIZE,
            default_owner: "local".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl FragmentsConfig {
    /// Parse from TOML. Missing keys fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_owner.trim().is_empty() {
            return Err(ConfigError::Invalid("default_owner must not be blank".into()));
        }
        Ok(())
    }
}
