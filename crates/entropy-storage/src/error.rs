//! Storage error types.
//!
//! A cache or store miss is never an error: lookups return `Ok(None)` and the
//! caller synthesizes a vector. Everything here is a storage-layer fault and
//! aborts learning when it surfaces.
//!
//! # Error Categories
//!
//! - **Lifecycle**: `OpenFailed`, `FlushFailed`
//! - **Data path**: `WriteFailed`, `ReadFailed`
//! - **Integrity**: `Codec`, `InvalidKey`
//! - **Internal**: `ColumnFamilyNotFound`, `Internal`, `Config`

use markov_entropy_core::CoreError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database failed to open at the specified path.
    #[error("Failed to open database at '{path}': {message}")]
    OpenFailed {
        /// The path where database open was attempted
        path: String,
        /// The underlying error message from RocksDB
        message: String,
    },

    /// Column family not found in the database.
    #[error("Column family '{name}' not found")]
    ColumnFamilyNotFound {
        /// Name of the missing column family
        name: String,
    },

    /// Write operation failed.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Read operation failed.
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// Flush operation failed.
    #[error("Flush failed: {0}")]
    FlushFailed(String),

    /// A stored blob did not decompress to the expected length.
    #[error("Codec error for key {key}: {message}")]
    Codec {
        /// Hex rendering of the offending key
        key: String,
        /// What went wrong
        message: String,
    },

    /// A stored key has the wrong length for the configured order.
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKey {
        /// Configured order
        expected: usize,
        /// Length found on disk
        actual: usize,
    },

    /// Invalid configuration reached the storage layer.
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    /// Unexpected internal failure (thread pool creation, poisoned state).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Build a `Codec` error, rendering the key as hex.
    pub fn codec(key: &[u8], message: impl Into<String>) -> Self {
        StorageError::Codec {
            key: hex(key),
            message: message.into(),
        }
    }

    /// True for errors that indicate on-disk corruption rather than an
    /// environmental failure.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StorageError::Codec { .. } | StorageError::InvalidKey { .. }
        )
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Convenient Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_failed_message() {
        let error = StorageError::OpenFailed {
            path: "/invalid/path".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert!(error.to_string().contains("/invalid/path"));
        assert!(!error.is_corruption());
    }

    #[test]
    fn test_codec_renders_key_as_hex() {
        let error = StorageError::codec(&[0, 0x61, 0xff], "short blob");
        let msg = error.to_string();
        assert!(msg.contains("0061ff"), "got: {}", msg);
        assert!(msg.contains("short blob"));
        assert!(error.is_corruption());
    }

    #[test]
    fn test_from_core_error() {
        let error: StorageError = CoreError::invalid_config("capacity must be > 0").into();
        assert!(matches!(error, StorageError::Config(_)));
        assert!(error.to_string().contains("capacity"));
    }
}
