//! TOML configuration for the store and the demo binary.
//!
//! ```toml
//! channel_capacity = 64
//! seed_demo_data = false
//! log_filter = "blog_store=debug"
//! default_page_size = 5
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Capacity of the store actor's request queue.
    pub channel_capacity: usize,
    /// Load the demo fixtures on startup.
    pub seed_demo_data: bool,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub default_page_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            seed_demo_data: true,
            log_filter: "info".to_string(),
            default_page_size: 10,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // A zero-capacity mpsc channel panics on creation.
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be at least 1".into()));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid("default_page_size must be at least 1".into()));
        }
        Ok(())
    }
}
