//! Root configuration for learning and search.
//!
//! `EntropyConfig` aggregates every subsystem section. It is built once and
//! threaded through constructors; nothing reads configuration from globals.
//!
//! # TOML Structure
//!
//! ```toml
//! [model]
//! order = 4
//! width = 256
//!
//! [cache]
//! capacity = 1048576
//!
//! [store]
//! path = "model.rocksdb"
//!
//! [scoring]
//! kernel = "self_entropy"
//! normalization = "softmax"
//!
//! [search]
//! depth = 2
//! objective = "minimize"
//! growth = "append"
//! iterations = 128
//! ```

mod cache;
mod model;
mod scoring;
mod search;
mod store;


pub use cache::CacheConfig;
pub use model::{ModelConfig, ALPHABET};
pub use scoring::{KernelKind, Normalization, Representation, ScoringConfig};
pub use search::{Growth, Objective, SearchConfig};
pub use store::StoreConfig;

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

/// Root configuration.
///
/// Load from TOML or use `Default::default()`; call [`EntropyConfig::validate`]
/// before handing it to the storage or search layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntropyConfig {
    /// Context order and vector width
    #[serde(default)]
    pub model: ModelConfig,

    /// Recency cache sizing
    #[serde(default)]
    pub cache: CacheConfig,

    /// RocksDB backing store
    #[serde(default)]
    pub store: StoreConfig,

    /// Scoring kernel selection
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Beam search parameters
    #[serde(default)]
    pub search: SearchConfig,
}

impl EntropyConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - `CoreError::Io` if the file cannot be read
    /// - `CoreError::InvalidConfig` if TOML parsing fails
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| CoreError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| {
            CoreError::invalid_config(format!(
                "Failed to parse TOML in '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Create configuration from a TOML string.
    ///
    /// # Errors
    /// - `CoreError::InvalidConfig` if TOML parsing fails
    pub fn from_toml_str(toml: &str) -> CoreResult<Self> {
        toml::from_str(toml)
            .map_err(|e| CoreError::invalid_config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to a TOML string.
    ///
    /// # Errors
    /// - `CoreError::InvalidConfig` if serialization fails
    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::invalid_config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Validate all sections, returning the first error found.
    ///
    /// The message is prefixed with the offending section, e.g. `[model]`.
    pub fn validate(&self) -> CoreResult<()> {
        fn section(name: &str, result: CoreResult<()>) -> CoreResult<()> {
            result.map_err(|e| CoreError::invalid_config(format!("[{}] {}", name, e)))
        }

        section("model", self.model.validate())?;
        section("cache", self.cache.validate())?;
        section("store", self.store.validate())?;
        section("scoring", self.scoring.validate())?;
        section("search", self.search.validate())?;
        Ok(())
    }

    /// Apply environment variable overrides. Prefix: `ENTROPY_`.
    ///
    /// | Variable | Config Path | Type |
    /// |----------|-------------|------|
    /// | `ENTROPY_MODEL_ORDER` | `model.order` | usize |
    /// | `ENTROPY_MODEL_WIDTH` | `model.width` | usize |
    /// | `ENTROPY_CACHE_CAPACITY` | `cache.capacity` | usize |
    /// | `ENTROPY_STORE_PATH` | `store.path` | path |
    /// | `ENTROPY_SEARCH_DEPTH` | `search.depth` | usize |
    /// | `ENTROPY_SEARCH_ITERATIONS` | `search.iterations` | usize |
    /// | `ENTROPY_SEARCH_WORKERS` | `search.workers` | usize |
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
            let value = env::var(name).ok()?;
            match value.parse::<T>() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    warn!(variable = name, value = %value, "Ignoring unparseable override");
                    None
                }
            }
        }

        if let Some(n) = parsed("ENTROPY_MODEL_ORDER") {
            self.model.order = n;
        }
        if let Some(n) = parsed("ENTROPY_MODEL_WIDTH") {
            self.model.width = n;
        }
        if let Some(n) = parsed("ENTROPY_CACHE_CAPACITY") {
            self.cache.capacity = n;
        }
        if let Ok(val) = env::var("ENTROPY_STORE_PATH") {
            self.store.path = PathBuf::from(val);
        }
        if let Some(n) = parsed("ENTROPY_SEARCH_DEPTH") {
            self.search.depth = n;
        }
        if let Some(n) = parsed("ENTROPY_SEARCH_ITERATIONS") {
            self.search.iterations = n;
        }
        if let Some(n) = parsed("ENTROPY_SEARCH_WORKERS") {
            self.search.workers = n;
        }

        self
    }
}
