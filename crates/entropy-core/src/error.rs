//! Core error types.
//!
//! Errors raised while building configuration and domain values. Shape
//! mismatches inside matrix operations are not represented here: they are
//! configuration inconsistencies and panic at the call site.

use thiserror::Error;

/// Errors for configuration and domain value construction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the offending value
        message: String,
    },

    /// A symbol context was built with an unsupported length.
    #[error("Invalid context length {actual}: must be between 1 and {max}")]
    InvalidContextLength {
        /// Length that was requested
        actual: usize,
        /// Largest supported context length
        max: usize,
    },

    /// A frequency vector was built with the wrong number of counters.
    #[error("Frequency vector width mismatch: expected {expected}, got {actual}")]
    WidthMismatch {
        /// Configured width
        expected: usize,
        /// Width that was supplied
        actual: usize,
    },

    /// Reading a configuration file failed.
    #[error("I/O error reading '{path}': {message}")]
    Io {
        /// File that could not be read
        path: String,
        /// Underlying error message
        message: String,
    },
}

impl CoreError {
    /// Shorthand for an `InvalidConfig` error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CoreError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Convenient Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_invalid_config() {
        let error = CoreError::invalid_config("[model] order must be >= 2");
        let msg = error.to_string();
        assert!(msg.contains("Invalid configuration"));
        assert!(msg.contains("[model]"));
    }

    #[test]
    fn test_error_context_length() {
        let error = CoreError::InvalidContextLength { actual: 40, max: 16 };
        let msg = error.to_string();
        assert!(msg.contains("40"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn test_error_width_mismatch() {
        let error = CoreError::WidthMismatch {
            expected: 256,
            actual: 255,
        };
        assert!(error.to_string().contains("expected 256, got 255"));
    }
}
