//! Application configuration loaded from `~/.skrid/config.yaml`.
//!
//! Every section and field is optional; anything missing falls back to its
//! default. Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::{KeyMap, KeyboardLayout};
use crate::notation::LayoutMetrics;
use crate::playback::{PlaybackConfig, PlaybackError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid playback settings in {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: PlaybackError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub layout: KeyboardLayout,
    /// Octave of the lower key row.
    pub base_octave: i8,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            layout: KeyboardLayout::Azerty,
            base_octave: 4,
        }
    }
}

impl KeyboardConfig {
    pub fn key_map(&self) -> KeyMap {
        KeyMap::new(self.layout, self.base_octave)
    }
}

/// Where note sounds come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplesConfig {
    /// Directory of `<key>.wav` files. `None` synthesizes tones instead.
    pub directory: Option<PathBuf>,
    /// Seed of the synthesized tones.
    pub seed: u64,
    /// Octaves synthesized when no directory is set.
    pub low_octave: i8,
    pub high_octave: i8,
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self {
            directory: None,
            seed: 42,
            low_octave: 1,
            high_octave: 7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub keyboard: KeyboardConfig,
    pub samples: SamplesConfig,
    pub playback: PlaybackConfig,
    pub layout: LayoutMetrics,
}

impl AppConfig {
    /// Standard location, `~/.skrid/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skrid").join("config.yaml"))
    }

    /// Load from the standard path. Returns None if there is no readable,
    /// valid file there.
    pub fn load() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path).ok()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config
            .playback
            .validate()
            .map_err(|source| ConfigError::Invalid {
                path: path.to_path_buf(),
                source,
            })?;
        config.layout = config.layout.clamped();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        std::fs::write(path, yaml)
    }
}
