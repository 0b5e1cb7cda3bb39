//! Context cache configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

fn default_capacity() -> usize {
    1 << 20
}

/// Configuration for the recency-ordered context cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of resident contexts.
    /// A flush at capacity evicts `capacity / 2` (at least one) entries.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Worker threads used to encode and compress an eviction batch.
    /// 0 means available parallelism.
    #[serde(default)]
    pub eviction_workers: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            eviction_workers: 0,
        }
    }
}

impl CacheConfig {
    /// Validate cache configuration values.
    ///
    /// # Errors
    /// - `CoreError::InvalidConfig` if capacity is 0
    pub fn validate(&self) -> CoreResult<()> {
        if self.capacity == 0 {
            return Err(CoreError::invalid_config("capacity cannot be 0"));
        }
        Ok(())
    }
}
