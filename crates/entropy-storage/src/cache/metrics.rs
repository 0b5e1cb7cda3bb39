//! Cache metrics with atomic counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters for cache activity.
///
/// Relaxed ordering throughout; these are statistics, not synchronization.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Lookups that found a resident node.
    pub hits: AtomicU64,
    /// Lookups that had to admit a new node.
    pub misses: AtomicU64,
    /// Misses that were satisfied by decoding a backing-store blob.
    pub backing_hits: AtomicU64,
    /// Nodes written to the backing store by `flush`.
    pub evictions: AtomicU64,
}

impl CacheMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.backing_hits.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backing_hit(&self) {
        self.backing_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    /// Fraction of lookups served by a resident node, 0.0 when idle.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
