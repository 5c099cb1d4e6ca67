//! Editor configuration persistence
//!
//! Stores preferences in `~/.config/twinmark/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::Space;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("config io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Undo depth per document, 0 keeps every revision
    #[serde(default)]
    pub history_depth: usize,

    /// Mode the editor starts in
    #[serde(default)]
    pub default_mode: Space,

    /// Environment variable holding the assistant API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model name sent to the assistant provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Override for where documents and settings are persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 0,
            default_mode: Space::Text,
            api_key_env: default_api_key_env(),
            model: default_model(),
            data_dir: None,
        }
    }
}

impl EditorConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`. Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
