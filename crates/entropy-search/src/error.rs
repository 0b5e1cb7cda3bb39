//! Search error types.

use markov_entropy_core::CoreError;
use markov_entropy_storage::StorageError;
use thiserror::Error;

/// Errors raised while scoring or searching.
///
/// A context that is missing from the model is not an error; it resolves to
/// the fallback vector. These variants are genuine faults or bad input.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backing store failed while scoring a candidate.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    /// Diffusion needs at least one seed symbol to mutate.
    #[error("Seed input is empty")]
    EmptySeed,

    /// A substitution index fell outside the sequence.
    #[error("Mutation index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Sequence length
        len: usize,
    },

    /// The search was cancelled before producing a result.
    #[error("Search cancelled")]
    Cancelled,

    /// Worker pool or join failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// True when the underlying storage reports corruption.
    pub fn is_corruption(&self) -> bool {
        matches!(self, SearchError::Storage(e) if e.is_corruption())
    }
}

/// Convenient Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
