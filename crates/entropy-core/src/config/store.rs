//! Persisted store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

fn default_path() -> PathBuf {
    PathBuf::from("model.rocksdb")
}

fn default_block_cache_size() -> usize {
    256 * 1024 * 1024
}

fn default_max_open_files() -> i32 {
    1000
}

fn default_true() -> bool {
    true
}

/// Configuration for the RocksDB backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database directory.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Shared block cache size in bytes (default: 256MB).
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    /// Maximum number of open files (default: 1000).
    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,

    /// Enable the write-ahead log (default: true).
    #[serde(default = "default_true")]
    pub enable_wal: bool,

    /// Create the database if it doesn't exist (default: true).
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            block_cache_size: default_block_cache_size(),
            max_open_files: default_max_open_files(),
            enable_wal: true,
            create_if_missing: true,
        }
    }
}

impl StoreConfig {
    /// Validate store configuration values.
    ///
    /// # Errors
    /// - `CoreError::InvalidConfig` if the path is empty
    /// - `CoreError::InvalidConfig` if max_open_files is 0 or below -1
    pub fn validate(&self) -> CoreResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(CoreError::invalid_config("path cannot be empty"));
        }
        // -1 is RocksDB's "unlimited"
        if self.max_open_files == 0 || self.max_open_files < -1 {
            return Err(CoreError::invalid_config(format!(
                "max_open_files must be -1 or positive, got {}",
                self.max_open_files
            )));
        }
        Ok(())
    }
}
