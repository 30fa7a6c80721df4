//! # Scene Configuration
//!
//! Scene naming and on-disk layout, loaded once at startup from TOML.
//!
//! ```toml
//! # scene.toml
//! name = "Level1"
//! entity_file_prefix = "Entity_"
//! entity_file_extension = "ent"
//!
//! [registry]
//! initial_pool_capacity = 256
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use wire_core::{ConfigError, ConfigResult, RegistryConfig};

/// Default scene name.
pub const DEFAULT_SCENE_NAME: &str = "Scene";

/// Default entity file name prefix.
pub const DEFAULT_ENTITY_PREFIX: &str = "Entity_";

/// Default entity file extension, without the dot.
pub const DEFAULT_ENTITY_EXTENSION: &str = "ent";

/// Configuration for a [`Scene`](crate::Scene) and its storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Scene name.
    pub name: String,
    /// Prepended to the entity id in file names.
    pub entity_file_prefix: String,
    /// Extension of entity files, without the dot.
    pub entity_file_extension: String,
    /// Registry tuning.
    pub registry: RegistryConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SCENE_NAME.to_owned(),
            entity_file_prefix: DEFAULT_ENTITY_PREFIX.to_owned(),
            entity_file_extension: DEFAULT_ENTITY_EXTENSION.to_owned(),
            registry: RegistryConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parses a configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for unusable file naming.
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

    /// Checks that entity files can be named from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty extension or a prefix
    /// or extension containing a path separator or a dot.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.entity_file_extension.is_empty() {
            return Err(ConfigError::Invalid("entity_file_extension is empty".into()));
        }
        for (key, value) in [
            ("entity_file_prefix", &self.entity_file_prefix),
            ("entity_file_extension", &self.entity_file_extension),
        ] {
            if value.contains(&['/', '\\', '.'][..]) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must not contain a path separator or '.': {value:?}"
                )));
            }
        }
        self.registry.validate()
    }
}
