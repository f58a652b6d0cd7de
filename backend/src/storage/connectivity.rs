//! Storage configuration and connectivity state.
//!
//! A household can point the tracker at a shared folder (a synced or network
//! mounted directory) so several devices see the same chart. When that folder
//! can't be reached the connection falls back to the local data directory and
//! reports [`Connectivity::Offline`]. The state belongs to the connection
//! value; there is no process-wide flag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a storage connection reads and writes its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Local data directory, always available
    pub data_directory: PathBuf,
    /// Optional shared directory preferred over the local one when reachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_directory: Option<PathBuf>,
}

impl StorageConfig {
    pub fn local<P: Into<PathBuf>>(data_directory: P) -> Self {
        Self {
            data_directory: data_directory.into(),
            shared_directory: None,
        }
    }

    pub fn with_shared_directory<P: Into<PathBuf>>(mut self, shared_directory: P) -> Self {
        self.shared_directory = Some(shared_directory.into());
        self
    }
}

/// Which directory a connection is currently using
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// No shared directory configured
    Local,
    /// Shared directory configured and reachable
    Online,
    /// Shared directory configured but unreachable; using local fallback
    Offline,
}

impl Connectivity {
    pub fn is_offline(&self) -> bool {
        matches!(self, Connectivity::Offline)
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Local => write!(f, "local"),
            Connectivity::Online => write!(f, "online"),
            Connectivity::Offline => write!(f, "offline"),
        }
    }
}
