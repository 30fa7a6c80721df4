//! # Registry Configuration
//!
//! Tuning knobs for the storage engine, loaded once at startup from TOML.
//!
//! ```toml
//! # registry.toml
//! initial_pool_capacity = 100
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Records reserved by a freshly created pool when nothing else is configured.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Number of records each new pool pre-reserves.
    pub initial_pool_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Parses a configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// whatever [`Self::from_toml_str`] reports.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges that the schema alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an absurd pool reservation.
    pub fn validate(&self) -> ConfigResult<()> {
        // One million records per pool is far beyond any sane up-front reservation.
        if self.initial_pool_capacity > 1_000_000 {
            return Err(ConfigError::Invalid(format!(
                "initial_pool_capacity {} exceeds 1000000",
                self.initial_pool_capacity
            )));
        }
        Ok(())
    }
}
