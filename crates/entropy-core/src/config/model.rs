//! Model shape configuration.
//!
//! `order` and `width` must agree between the learning pass, the stored
//! model and the search; a mismatch surfaces as a matrix shape panic.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::MAX_ORDER;

/// Number of distinct byte symbols.
pub const ALPHABET: usize = 256;

fn default_order() -> usize {
    4
}

fn default_width() -> usize {
    ALPHABET
}

/// Context length and vector width of the markov model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of symbols in a context key.
    /// Range: `[2, 16]`
    #[serde(default = "default_order")]
    pub order: usize,

    /// Dimensionality of a frequency vector. Must be a multiple of 256.
    #[serde(default = "default_width")]
    pub width: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            width: default_width(),
        }
    }
}

impl ModelConfig {
    /// Validate model configuration values.
    ///
    /// # Errors
    /// - `CoreError::InvalidConfig` if order is outside `[2, 16]`
    /// - `CoreError::InvalidConfig` if width is zero or not a multiple of 256
    pub fn validate(&self) -> CoreResult<()> {
        if self.order < 2 || self.order > MAX_ORDER {
            return Err(CoreError::invalid_config(format!(
                "order must be in [2, {}], got {}",
                MAX_ORDER, self.order
            )));
        }
        if self.width == 0 || self.width % ALPHABET != 0 {
            return Err(CoreError::invalid_config(format!(
                "width must be a non-zero multiple of {}, got {}",
                ALPHABET, self.width
            )));
        }
        Ok(())
    }

    /// Number of zero bytes prepended to a seed before the first search step.
    pub fn padding(&self) -> usize {
        self.order.saturating_sub(2)
    }

    /// Number of backoff levels probed by the multi-order lookup.
    pub fn backoff_levels(&self) -> usize {
        self.order - 1
    }
}
