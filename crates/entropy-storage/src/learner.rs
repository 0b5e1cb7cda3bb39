//! Single-writer learning pass for the counter model.

use markov_entropy_core::{CacheConfig, ModelConfig, SymbolContext};
use tracing::{debug, info};

use crate::backing::BackingStore;
use crate::cache::ContextCache;
use crate::error::StorageResult;

/// Folds documents into a [`ContextCache`].
///
/// For every window start `i` the rolling context (the `order` symbols
/// before `i`, zero-padded at the start of a document) is recorded at each
/// backoff level: level `j` zeroes the `j` oldest positions. The vector
/// under each key counts `data[i]` and the following `order - 1` symbols.
pub struct CounterLearner<S: BackingStore> {
    cache: ContextCache<S>,
    order: usize,
    documents: u64,
    positions: u64,
}

impl<S: BackingStore> CounterLearner<S> {
    pub fn new(model: &ModelConfig, cache: &CacheConfig, store: S) -> StorageResult<Self> {
        model.validate()?;
        Ok(Self {
            cache: ContextCache::new(cache, model.width, store)?,
            order: model.order,
            documents: 0,
            positions: 0,
        })
    }

    /// Learn one document. Documents shorter than the order are skipped.
    ///
    /// # Errors
    /// Any cache or store failure. Learning cannot continue past one.
    pub fn learn(&mut self, data: &[u8]) -> StorageResult<()> {
        let order = self.order;
        if data.len() < order {
            debug!(len = data.len(), order, "Skipping short document");
            return Ok(());
        }

        let mut context = SymbolContext::zeroed(order)?;
        let windows = data.len() - order + 1;
        for i in 0..windows {
            let symbol = data[i];
            for level in 0..order - 1 {
                let key = context.masked(level);
                let (vector, _) = self.cache.get(&key)?;
                vector.increment(symbol as usize);
                for &next in &data[i + 1..i + order] {
                    vector.increment(next as usize);
                }
                self.cache.flush()?;
            }
            context.push(symbol);
        }

        self.documents += 1;
        self.positions += windows as u64;
        info!(
            document = self.documents,
            windows,
            resident = self.cache.len(),
            "Learned document"
        );
        Ok(())
    }

    /// Close the cache into the backing store and return the store.
    pub fn finish(mut self) -> StorageResult<S> {
        let written = self.cache.close()?;
        info!(
            documents = self.documents,
            positions = self.positions,
            written,
            "Learning finished"
        );
        Ok(self.cache.into_store())
    }

    pub fn cache(&self) -> &ContextCache<S> {
        &self.cache
    }

    pub fn documents(&self) -> u64 {
        self.documents
    }

    pub fn positions(&self) -> u64 {
        self.positions
    }
}
