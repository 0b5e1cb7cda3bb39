//! Core types for the Markov self-entropy model.
//!
//! - [`config`]: TOML-backed configuration threaded through every layer
//! - [`types`]: [`SymbolContext`] keys and saturating [`FrequencyVector`]s
//! - [`matrix`]: row-major real and complex matrices
//! - [`kernel`]: self-entropy scoring kernels
//!
//! This crate has no I/O beyond reading configuration files. Storage lives in
//! `markov-entropy-storage`, search in `markov-entropy-search`.

pub mod config;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod types;

pub use config::{
    CacheConfig, EntropyConfig, Growth, KernelKind, ModelConfig, Normalization, Objective,
    Representation, ScoringConfig, SearchConfig, StoreConfig, ALPHABET,
};
pub use error::{CoreError, CoreResult};
pub use kernel::{complex_self_entropy_kernel, direct_entropy, self_entropy_kernel};
pub use matrix::{ComplexMatrix, Matrix};
pub use types::{FrequencyVector, SymbolContext, MAX_ORDER};
