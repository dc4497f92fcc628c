//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::IndexError;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub skiplist: SkipListConfig,
}

impl Config {
    /// Load configuration from `path`, writing the defaults there if the
    /// file does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, IndexError> {
        Ok(toml::from_str(contents)?)
    }
}

/// Bounds of the square world indexed by the quadtree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorldConfig {
    /// Side length; the world spans `[0, width]` on both axes.
    #[serde(default = "default_world_width")]
    pub width: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_world_width(),
        }
    }
}

fn default_world_width() -> i32 {
    1024
}

/// Skip list settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkipListConfig {
    /// Fixed RNG seed for level draws. Unset means seeded from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}
