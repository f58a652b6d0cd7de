//! Temporary data directories for storage and service tests.
//!
//! The directory is removed when the environment drops, even when a test
//! panics.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;
use crate::storage::connectivity::StorageConfig;

pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Local data directory the connection writes to
    pub base_path: PathBuf,
    /// Shared directory, when the environment was built with one
    pub shared_path: Option<PathBuf>,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    /// Environment backed by a single local directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new_local(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            shared_path: None,
            _temp_dir: temp_dir,
        })
    }

    /// Environment with a local directory plus a shared one.
    /// The shared directory only exists when `mounted` is true.
    pub fn with_shared_directory(mounted: bool) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let local = temp_dir.path().join("local");
        let shared = temp_dir.path().join("shared");
        if mounted {
            std::fs::create_dir_all(&shared)?;
        }

        let connection =
            CsvConnection::new(StorageConfig::local(&local).with_shared_directory(&shared))?;
        Ok(Self {
            connection,
            base_path: local,
            shared_path: Some(shared),
            _temp_dir: temp_dir,
        })
    }
}
