//! # Tracker Configuration
//!
//! A single YAML file in the platform config directory, created with
//! defaults the first time the tracker runs.
//!
//! ```yaml
//! storage:
//!   data_directory: /home/me/.local/share/chore-tracker
//!   shared_directory: /mnt/family-share/chore-tracker
//! seed_on_first_run: true
//! recent_redemptions_limit: 5
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::redemption_service::DEFAULT_RECENT_LIMIT;
use crate::storage::StorageConfig;

const APP_DIR: &str = "chore-tracker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageConfig,

    /// Insert the default children, tasks and rewards into empty catalogs
    #[serde(default = "default_true")]
    pub seed_on_first_run: bool,

    #[serde(default = "default_recent_limit")]
    pub recent_redemptions_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            seed_on_first_run: true,
            recent_redemptions_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

fn default_storage() -> StorageConfig {
    StorageConfig::local(TrackerConfig::default_data_directory())
}

fn default_true() -> bool {
    true
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl TrackerConfig {
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.yaml")
    }

    pub fn default_data_directory() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Load from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_config_path())
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        debug!("Loading configuration from {:?}", config_path);

        if !config_path.exists() {
            info!("No configuration at {:?}, writing defaults", config_path);
            let config = Self::default();
            config.save_to_path(config_path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: TrackerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        debug!("Saved configuration to {:?}", config_path);
        Ok(())
    }
}
