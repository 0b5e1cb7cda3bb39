//! Domain types shared by the storage and search layers.
//!
//! - [`SymbolContext`]: fixed-length byte context used as an exact-match key
//! - [`FrequencyVector`]: saturating 16-bit counters with decay-on-saturation

mod frequency;
mod symbols;

pub use frequency::FrequencyVector;
pub use symbols::{SymbolContext, MAX_ORDER};
