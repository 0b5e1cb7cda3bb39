//! Storage layer for the Markov self-entropy model.
//!
//! Learning folds text into a bounded [`ContextCache`] that spills its
//! coldest entries, LZ4-compressed, into a [`BackingStore`]. Scoring reads
//! the store back through [`MultiOrderLookup`], backing off to shorter
//! contexts and finally to a random unit vector.
//!
//! # Modules
//! - [`codec`]: counter/complex serialization and LZ4 blocks
//! - [`backing`]: the store trait and the in-memory implementation
//! - [`rocksdb_store`]: the persisted `markov` column family
//! - [`cache`]: arena-based recency list with batched eviction
//! - [`learner`], [`complex_learner`]: the learning passes
//! - [`lookup`]: multi-order backoff

pub mod backing;
pub mod cache;
pub mod codec;
pub mod column_families;
pub mod complex_learner;
pub mod error;
pub mod learner;
pub mod lookup;
pub mod rocksdb_store;

pub use backing::{BackingStore, InMemoryBackingStore};
pub use cache::{CacheMetrics, ContextCache, EvictedBatch};
pub use complex_learner::ComplexLearner;
pub use error::{StorageError, StorageResult};
pub use learner::CounterLearner;
pub use lookup::{ComplexResolved, MatchLevel, MultiOrderLookup, Resolved};
pub use rocksdb_store::RocksDbMarkovStore;
