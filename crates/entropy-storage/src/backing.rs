//! Backing store abstraction for evicted context vectors.
//!
//! The cache and the lookup only need point reads and batched writes of
//! compressed blobs keyed by [`SymbolContext`]. Two implementations exist:
//! [`InMemoryBackingStore`] for tests and small corpora, and
//! [`crate::RocksDbMarkovStore`] for persisted models.

use std::collections::BTreeMap;
use std::sync::Arc;

use markov_entropy_core::SymbolContext;
use parking_lot::RwLock;

use crate::error::StorageResult;

/// Keyed storage for compressed vector blobs.
///
/// All methods take `&self`: implementations are safe for concurrent
/// readers, which the search relies on. Writes only happen from the single
/// learning writer.
pub trait BackingStore: Send + Sync {
    /// Compressed blob for `key`, or `None` on a miss.
    fn get(&self, key: &SymbolContext) -> StorageResult<Option<Vec<u8>>>;

    /// Insert or overwrite several blobs at once.
    fn put_batch(&self, entries: Vec<(SymbolContext, Vec<u8>)>) -> StorageResult<()>;

    /// Insert or overwrite a single blob.
    fn put(&self, key: SymbolContext, blob: Vec<u8>) -> StorageResult<()> {
        self.put_batch(vec![(key, blob)])
    }

    /// Number of stored contexts.
    fn len(&self) -> StorageResult<usize>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Persist buffered writes. No-op for in-memory stores.
    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl<S: BackingStore + ?Sized> BackingStore for Arc<S> {
    fn get(&self, key: &SymbolContext) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put_batch(&self, entries: Vec<(SymbolContext, Vec<u8>)>) -> StorageResult<()> {
        (**self).put_batch(entries)
    }

    fn len(&self) -> StorageResult<usize> {
        (**self).len()
    }

    fn flush(&self) -> StorageResult<()> {
        (**self).flush()
    }
}

/// Ordered in-memory map behind a read-write lock.
///
/// A `BTreeMap` keeps iteration in key order so bulk copies into a persisted
/// store are reproducible.
#[derive(Debug, Default)]
pub struct InMemoryBackingStore {
    entries: RwLock<BTreeMap<SymbolContext, Vec<u8>>>,
}

impl InMemoryBackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry in key order.
    pub fn entries(&self) -> Vec<(SymbolContext, Vec<u8>)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }

    pub fn contains(&self, key: &SymbolContext) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl BackingStore for InMemoryBackingStore {
    fn get(&self, key: &SymbolContext) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put_batch(&self, entries: Vec<(SymbolContext, Vec<u8>)>) -> StorageResult<()> {
        let mut map = self.entries.write();
        for (key, blob) in entries {
            map.insert(key, blob);
        }
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.entries.read().len())
    }
}
