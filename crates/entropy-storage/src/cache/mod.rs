//! Bounded recency cache of context frequency vectors.
//!
//! Nodes live in an arena addressed by `u32` indices. Index 0 is a sentinel
//! meaning "no node", so links never dangle. When the cache reaches capacity,
//! [`ContextCache::flush`] evicts the coldest half into the backing store as
//! LZ4-compressed blobs.

mod core;
mod metrics;

#[cfg(test)]
mod tests;

pub use self::core::{ContextCache, EvictedBatch};
pub use self::metrics::CacheMetrics;
