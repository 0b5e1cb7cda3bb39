//! CLI errors and exit codes.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Recoverable error
//! - 2: Corruption in the model store

use markov_entropy_core::CoreError;
use markov_entropy_search::SearchError;
use markov_entropy_storage::StorageError;
use thiserror::Error;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    /// Recoverable error, nothing on disk is damaged
    Warning = 1,
    /// The model store is corrupt; rerunning will not help
    Blocking = 2,
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

impl From<&StorageError> for CliExitCode {
    fn from(err: &StorageError) -> Self {
        if err.is_corruption() {
            return CliExitCode::Blocking;
        }
        match err {
            StorageError::ReadFailed(message) | StorageError::OpenFailed { message, .. }
                if is_corruption_indicator(message) =>
            {
                CliExitCode::Blocking
            }
            _ => CliExitCode::Warning,
        }
    }
}

impl From<&SearchError> for CliExitCode {
    fn from(err: &SearchError) -> Self {
        if err.is_corruption() {
            return CliExitCode::Blocking;
        }
        match err {
            SearchError::Storage(e) => CliExitCode::from(e),
            _ => CliExitCode::Warning,
        }
    }
}

/// RocksDB reports corruption only through its status text.
#[inline]
pub fn is_corruption_indicator(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    CORRUPTION_INDICATORS
        .iter()
        .any(|&indicator| lower.contains(indicator))
}

/// Corruption indicator strings (lowercase).
const CORRUPTION_INDICATORS: &[&str] = &[
    "corruption",
    "corrupted",
    "checksum mismatch",
    "bad magic",
    "truncated",
];

/// Any failure a command can report.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Search(#[from] SearchError),

    /// Reading a corpus file or directory failed.
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },

    /// Arguments were syntactically valid but unusable.
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn exit_code(&self) -> CliExitCode {
        match self {
            CliError::Storage(e) => CliExitCode::from(e),
            CliError::Search(e) => CliExitCode::from(e),
            CliError::Config(_) | CliError::Io { .. } | CliError::Usage(_) => CliExitCode::Warning,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
