//! Arena-backed recency list with batched eviction.

use std::collections::HashMap;

use markov_entropy_core::{CacheConfig, CoreError, FrequencyVector, SymbolContext};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, error, info};

use crate::backing::BackingStore;
use crate::codec;
use crate::error::{StorageError, StorageResult};

use super::metrics::CacheMetrics;

/// Arena index meaning "no node".
const NIL: u32 = 0;

struct Node {
    key: SymbolContext,
    value: FrequencyVector,
    /// Toward the most recently used end (head).
    forward: u32,
    /// Toward the least recently used end (tail).
    backward: u32,
}

/// Keys written out by one [`ContextCache::flush`], most recently evicted
/// first. The first key was the warmest of the batch; the last was the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictedBatch {
    pub keys: Vec<SymbolContext>,
}

impl EvictedBatch {
    /// The most recently evicted key.
    pub fn newest(&self) -> Option<&SymbolContext> {
        self.keys.first()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Bounded LRU of [`FrequencyVector`]s that overflows into a [`BackingStore`].
///
/// Single writer: `get`, `flush` and `close` take `&mut self`. Only the
/// encode+compress step of eviction fans out, on a private rayon pool.
///
/// # Invariants
/// - after `flush`, `len() <= capacity`
/// - walking `backward` from the head visits every resident node once and
///   ends at the tail; walking `forward` from the tail is the mirror image
pub struct ContextCache<S: BackingStore> {
    nodes: Vec<Node>,
    free: Vec<u32>,
    index: HashMap<SymbolContext, u32>,
    head: u32,
    tail: u32,
    capacity: usize,
    width: usize,
    store: S,
    pool: ThreadPool,
    metrics: CacheMetrics,
}

impl<S: BackingStore> ContextCache<S> {
    /// Create a cache of `config.capacity` nodes holding vectors of `width`
    /// counters.
    ///
    /// # Errors
    /// - `StorageError::Config` if capacity or width is zero
    /// - `StorageError::Internal` if the eviction pool cannot be built
    pub fn new(config: &CacheConfig, width: usize, store: S) -> StorageResult<Self> {
        if let Err(e) = config.validate() {
            error!("ContextCache config error: {}", e);
            return Err(e.into());
        }
        if width == 0 {
            return Err(CoreError::invalid_config("width must be > 0").into());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.eviction_workers)
            .thread_name(|i| format!("cache-evict-{}", i))
            .build()
            .map_err(|e| StorageError::Internal(format!("eviction pool: {}", e)))?;

        let sentinel = Node {
            key: SymbolContext::zeroed(1)?,
            value: FrequencyVector::zeros(0),
            forward: NIL,
            backward: NIL,
        };

        Ok(Self {
            nodes: vec![sentinel],
            free: Vec::new(),
            index: HashMap::with_capacity(config.capacity.min(1 << 16)),
            head: NIL,
            tail: NIL,
            capacity: config.capacity,
            width,
            store,
            pool,
            metrics: CacheMetrics::new(),
        })
    }

    /// Fetch the vector for `key`, promoting it to most recently used.
    ///
    /// Returns the vector and whether it was already resident. A miss
    /// decodes the backing-store blob if there is one and otherwise admits a
    /// zero vector. Either way the new node becomes the head.
    ///
    /// # Errors
    /// - store read failures and `StorageError::Codec` for corrupt blobs
    pub fn get(&mut self, key: &SymbolContext) -> StorageResult<(&mut FrequencyVector, bool)> {
        if let Some(&idx) = self.index.get(key) {
            self.metrics.record_hit();
            self.promote(idx);
            return Ok((&mut self.nodes[idx as usize].value, true));
        }

        self.metrics.record_miss();
        let value = match self.store.get(key)? {
            Some(blob) => {
                self.metrics.record_backing_hit();
                codec::unpack_counts(key.as_bytes(), &blob, self.width)?
            }
            None => FrequencyVector::zeros(self.width),
        };

        let idx = self.allocate(*key, value);
        self.link_head(idx);
        self.index.insert(*key, idx);
        Ok((&mut self.nodes[idx as usize].value, false))
    }

    /// Evict the coldest `capacity / 2` nodes (at least one) once the cache
    /// is full. Below capacity this is a no-op returning `None`.
    ///
    /// Victims are chosen and unlinked sequentially from the tail; encoding
    /// and compression then run on the eviction pool and the blobs are
    /// written to the store as one batch.
    ///
    /// # Errors
    /// Any store write failure. The evicted nodes are already unlinked at
    /// that point, so the caller must treat the error as fatal.
    pub fn flush(&mut self) -> StorageResult<Option<EvictedBatch>> {
        if self.index.len() < self.capacity {
            return Ok(None);
        }

        let target = (self.capacity / 2).max(1);
        let mut victims = Vec::with_capacity(target);
        let mut cursor = self.tail;
        while victims.len() < target && cursor != NIL {
            victims.push(cursor);
            cursor = self.nodes[cursor as usize].forward;
        }

        // cursor is now the warmest survivor, or NIL if everything went
        self.tail = cursor;
        if cursor == NIL {
            self.head = NIL;
        } else {
            self.nodes[cursor as usize].backward = NIL;
        }

        let entries: Vec<(SymbolContext, FrequencyVector)> =
            victims.iter().map(|&idx| self.release(idx)).collect();

        let blobs: Vec<(SymbolContext, Vec<u8>)> = self.pool.install(|| {
            entries
                .par_iter()
                .map(|(key, value)| (*key, codec::pack_counts(value)))
                .collect()
        });
        self.store.put_batch(blobs)?;

        let evicted = entries.len();
        self.metrics.record_evictions(evicted as u64);
        debug!(
            evicted,
            resident = self.index.len(),
            capacity = self.capacity,
            "Flushed coldest contexts"
        );

        Ok(Some(EvictedBatch {
            keys: entries.into_iter().rev().map(|(key, _)| key).collect(),
        }))
    }

    /// Write every resident node to the backing store regardless of
    /// capacity and empty the cache. Returns the number of nodes written.
    pub fn close(&mut self) -> StorageResult<usize> {
        let mut order = Vec::with_capacity(self.index.len());
        let mut cursor = self.tail;
        while cursor != NIL {
            order.push(cursor);
            cursor = self.nodes[cursor as usize].forward;
        }
        self.head = NIL;
        self.tail = NIL;

        let entries: Vec<(SymbolContext, FrequencyVector)> =
            order.iter().map(|&idx| self.release(idx)).collect();
        let blobs: Vec<(SymbolContext, Vec<u8>)> = self.pool.install(|| {
            entries
                .par_iter()
                .map(|(key, value)| (*key, codec::pack_counts(value)))
                .collect()
        });
        let written = blobs.len();
        self.store.put_batch(blobs)?;
        self.store.flush()?;

        // Drop the arena so a long learning run does not keep its peak size.
        self.nodes.truncate(1);
        self.free.clear();

        info!(written, "Closed context cache");
        Ok(written)
    }

    /// Number of resident nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, key: &SymbolContext) -> bool {
        self.index.contains_key(key)
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the cache and return its backing store. Resident nodes that
    /// were not closed are discarded.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Resident keys from most to least recently used (head to tail).
    pub fn recency_keys(&self) -> Vec<SymbolContext> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while cursor != NIL && keys.len() <= self.index.len() {
            let node = &self.nodes[cursor as usize];
            keys.push(node.key);
            cursor = node.backward;
        }
        keys
    }

    /// Resident keys from least to most recently used (tail to head).
    pub fn recency_keys_from_tail(&self) -> Vec<SymbolContext> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.tail;
        while cursor != NIL && keys.len() <= self.index.len() {
            let node = &self.nodes[cursor as usize];
            keys.push(node.key);
            cursor = node.forward;
        }
        keys
    }

    fn allocate(&mut self, key: SymbolContext, value: FrequencyVector) -> u32 {
        let node = Node {
            key,
            value,
            forward: NIL,
            backward: NIL,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx as usize] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as u32
            }
        }
    }

    /// Remove `idx` from the index and hand back its contents. The caller
    /// has already fixed up the neighbouring links.
    fn release(&mut self, idx: u32) -> (SymbolContext, FrequencyVector) {
        let node = &mut self.nodes[idx as usize];
        node.forward = NIL;
        node.backward = NIL;
        let key = node.key;
        let value = std::mem::replace(&mut node.value, FrequencyVector::zeros(0));
        self.index.remove(&key);
        self.free.push(idx);
        (key, value)
    }

    fn promote(&mut self, idx: u32) {
        if idx == self.head {
            return;
        }
        let (forward, backward) = {
            let node = &self.nodes[idx as usize];
            (node.forward, node.backward)
        };
        // not the head, so forward is a real node
        self.nodes[forward as usize].backward = backward;
        if backward == NIL {
            self.tail = forward;
        } else {
            self.nodes[backward as usize].forward = forward;
        }
        self.link_head(idx);
    }

    fn link_head(&mut self, idx: u32) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[idx as usize];
            node.forward = NIL;
            node.backward = old_head;
        }
        if old_head == NIL {
            self.tail = idx;
        } else {
            self.nodes[old_head as usize].forward = idx;
        }
        self.head = idx;
    }
}
