use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{
    ChildRepository, CompletionRepository, RedemptionRepository, RewardRepository, TaskRepository,
};
use crate::storage::connectivity::{Connectivity, StorageConfig};
use crate::storage::traits::Connection;

pub const CHILDREN_FILE: &str = "children.yaml";
pub const TASKS_FILE: &str = "tasks.yaml";
pub const REWARDS_FILE: &str = "rewards.yaml";
pub const REDEMPTIONS_FILE: &str = "redemptions.csv";
pub const COMPLETIONS_FILE: &str = "completions.csv";

/// CsvConnection resolves the data directory and owns the connectivity state
#[derive(Clone)]
pub struct CsvConnection {
    config: StorageConfig,
    connectivity: Arc<Mutex<Connectivity>>,
}

impl CsvConnection {
    /// Create a new connection, creating the local data directory if needed
    pub fn new(config: StorageConfig) -> Result<Self> {
        if !config.data_directory.exists() {
            fs::create_dir_all(&config.data_directory).with_context(|| {
                format!("Failed to create data directory {}", config.data_directory.display())
            })?;
            info!("Created data directory: {}", config.data_directory.display());
        }

        let initial = if config.shared_directory.is_some() {
            Connectivity::Online
        } else {
            Connectivity::Local
        };

        let connection = Self {
            config,
            connectivity: Arc::new(Mutex::new(initial)),
        };

        // Resolve once up front so the initial state reflects reality
        let data_dir = connection.data_directory();
        info!(
            "Storage connection using {} ({})",
            data_dir.display(),
            connection.connectivity()
        );

        Ok(connection)
    }

    /// Connection on a single local directory
    pub fn new_local<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        Self::new(StorageConfig::local(data_directory.as_ref()))
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn connectivity(&self) -> Connectivity {
        *self.connectivity.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Directory that reads and writes go to right now.
    ///
    /// Re-checks the shared directory on every call so a folder that comes
    /// back is picked up again without restarting.
    pub fn data_directory(&self) -> PathBuf {
        let shared = match &self.config.shared_directory {
            Some(shared) => shared,
            None => return self.config.data_directory.clone(),
        };

        let reachable = shared.is_dir();
        let mut state = self.connectivity.lock().unwrap_or_else(|e| e.into_inner());

        match (reachable, *state) {
            (true, Connectivity::Offline) => {
                info!("Shared data directory {} is reachable again", shared.display());
                *state = Connectivity::Online;
            }
            (false, Connectivity::Online) => {
                warn!(
                    "Shared data directory {} unreachable. Falling back to local storage at {}",
                    shared.display(),
                    self.config.data_directory.display()
                );
                *state = Connectivity::Offline;
            }
            _ => {}
        }

        if reachable {
            shared.clone()
        } else {
            self.config.data_directory.clone()
        }
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.data_directory().join(file_name)
    }

    /// Read a YAML list, returning an empty list when the file doesn't exist
    pub fn read_yaml_list<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.file_path(file_name);

        if !path.exists() {
            debug!("{} doesn't exist yet, returning empty list", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Replace a YAML list file
    pub fn write_yaml_list<T: Serialize>(&self, file_name: &str, items: &[T]) -> Result<()> {
        let path = self.file_path(file_name);
        let content = serde_yaml::to_string(items)?;
        Self::write_atomic(&path, content.as_bytes())
    }

    /// Atomic write using temp file
    pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move {} into place", path.display()))?;

        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl Connection for CsvConnection {
    type ChildRepository = ChildRepository;
    type TaskRepository = TaskRepository;
    type RewardRepository = RewardRepository;
    type RedemptionRepository = RedemptionRepository;
    type CompletionRepository = CompletionRepository;

    fn create_child_repository(&self) -> Self::ChildRepository {
        ChildRepository::new(self.clone())
    }

    fn create_task_repository(&self) -> Self::TaskRepository {
        TaskRepository::new(self.clone())
    }

    fn create_reward_repository(&self) -> Self::RewardRepository {
        RewardRepository::new(self.clone())
    }

    fn create_redemption_repository(&self) -> Self::RedemptionRepository {
        RedemptionRepository::new(self.clone())
    }

    fn create_completion_repository(&self) -> Self::CompletionRepository {
        CompletionRepository::new(self.clone())
    }
}
