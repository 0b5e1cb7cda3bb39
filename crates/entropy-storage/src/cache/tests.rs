//! Tests for ContextCache recency ordering and eviction.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use markov_entropy_core::{CacheConfig, SymbolContext};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::backing::{BackingStore, InMemoryBackingStore};

use super::core::ContextCache;

// ========== Test Helpers ==========

const WIDTH: usize = 256;

fn key(first: u8) -> SymbolContext {
    SymbolContext::from_slice(&[first, 0, 0, 0]).expect("valid key")
}

fn keys(firsts: &[u8]) -> Vec<SymbolContext> {
    firsts.iter().map(|&k| key(k)).collect()
}

fn create_cache(capacity: usize) -> ContextCache<Arc<InMemoryBackingStore>> {
    let config = CacheConfig {
        capacity,
        eviction_workers: 2,
    };
    ContextCache::new(&config, WIDTH, Arc::new(InMemoryBackingStore::new()))
        .expect("cache should build")
}

/// Promote `k`, which must be resident, and compare both link directions.
fn check(cache: &mut ContextCache<Arc<InMemoryBackingStore>>, k: u8, state: &[u8]) {
    let (_, resident) = cache.get(&key(k)).expect("get");
    assert!(resident, "key {} should be found", k);

    assert_eq!(cache.recency_keys(), keys(state), "forward walk after {}", k);

    let mut reversed = state.to_vec();
    reversed.reverse();
    assert_eq!(
        cache.recency_keys_from_tail(),
        keys(&reversed),
        "backward walk after {}",
        k
    );
}

// ========== Eviction Order ==========

#[test]
fn test_eviction_trace_capacity_8() {
    println!("=== TEST: eviction trace for capacity 8 ===");
    let mut cache = create_cache(8);

    for i in 0..12u8 {
        let (_, resident) = cache.get(&key(i)).expect("get");
        assert!(!resident, "key {} should not be found", i);

        let evicted = cache.flush().expect("flush");
        match i {
            7 => {
                let batch = evicted.expect("nodes should be flushed at 7");
                println!("AFTER i=7: evicted {:?}", batch.keys);
                assert_eq!(batch.keys, keys(&[3, 2, 1, 0]));
                assert_eq!(batch.newest(), Some(&key(3)));
            }
            11 => {
                let batch = evicted.expect("nodes should be flushed at 11");
                println!("AFTER i=11: evicted {:?}", batch.keys);
                assert_eq!(batch.keys, keys(&[7, 6, 5, 4]));
            }
            _ => assert!(evicted.is_none(), "no nodes should be flushed at {}", i),
        }
    }

    assert_eq!(cache.len(), 4);
    assert_eq!(cache.store().len().unwrap(), 8);
    assert_eq!(cache.metrics().evictions.load(Ordering::Relaxed), 8);

    check(&mut cache, 8, &[8, 11, 10, 9]);
    check(&mut cache, 10, &[10, 8, 11, 9]);
    check(&mut cache, 8, &[8, 10, 11, 9]);
    check(&mut cache, 8, &[8, 10, 11, 9]);
}

#[test]
fn test_capacity_2_scenario() {
    let mut cache = create_cache(2);

    let (vector, resident) = cache.get(&key(0)).expect("get");
    assert!(!resident);
    assert!(vector.is_zero());
    assert!(cache.flush().expect("flush").is_none(), "below capacity");

    let (_, resident) = cache.get(&key(1)).expect("get");
    assert!(!resident);
    let batch = cache.flush().expect("flush").expect("should evict");
    assert_eq!(batch.keys, keys(&[0]));

    check(&mut cache, 1, &[1]);
    check(&mut cache, 1, &[1]);
    check(&mut cache, 1, &[1]);

    let (_, resident) = cache.get(&key(0)).expect("get");
    assert!(!resident, "evicted key is a miss again");
}

#[test]
fn test_capacity_1_evicts_single_node() {
    let mut cache = create_cache(1);
    cache.get(&key(5)).expect("get");
    let batch = cache.flush().expect("flush").expect("full at one node");
    assert_eq!(batch.keys, keys(&[5]));
    assert!(cache.is_empty());
    assert!(cache.recency_keys().is_empty());
}

// ========== Backing Store Round Trip ==========

#[test]
fn test_evicted_vector_decodes_on_next_miss() {
    let mut cache = create_cache(2);

    {
        let (vector, _) = cache.get(&key(0)).expect("get");
        vector.increment(b'x' as usize);
        vector.increment(b'x' as usize);
        vector.increment(b'y' as usize);
    }
    cache.get(&key(1)).expect("get");
    cache.flush().expect("flush").expect("evicts key 0");
    assert!(!cache.contains(&key(0)));

    let (vector, resident) = cache.get(&key(0)).expect("get");
    assert!(!resident);
    assert_eq!(vector.get(b'x' as usize), 2);
    assert_eq!(vector.get(b'y' as usize), 1);
    assert_eq!(cache.metrics().backing_hits.load(Ordering::Relaxed), 1);
}

#[test]
fn test_close_writes_everything() {
    let mut cache = create_cache(16);
    for i in 0..10u8 {
        let (vector, _) = cache.get(&key(i)).expect("get");
        vector.increment(i as usize);
    }

    let written = cache.close().expect("close");
    assert_eq!(written, 10);
    assert!(cache.is_empty());
    assert_eq!(cache.store().len().unwrap(), 10);

    let (vector, resident) = cache.get(&key(3)).expect("get after close");
    assert!(!resident);
    assert_eq!(vector.get(3), 1);
}

#[test]
fn test_corrupt_blob_is_codec_error() {
    let store = Arc::new(InMemoryBackingStore::new());
    store.put(key(9), vec![0xff, 0x00, 0x13]).unwrap();
    let config = CacheConfig {
        capacity: 4,
        eviction_workers: 1,
    };
    let mut cache = ContextCache::new(&config, WIDTH, Arc::clone(&store)).expect("cache");

    let result = cache.get(&key(9));
    assert!(matches!(result, Err(crate::StorageError::Codec { .. })));
}

// ========== Invariants ==========

#[test]
fn test_recency_and_capacity_invariants_random_workload() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut cache = create_cache(10);

    for step in 0..2_000 {
        let k = key(rng.gen_range(0..40u8));
        cache.get(&k).expect("get");
        cache.flush().expect("flush");

        assert!(cache.len() <= 10, "step {}: {} resident", step, cache.len());

        let forward = cache.recency_keys();
        let mut backward = cache.recency_keys_from_tail();
        backward.reverse();
        assert_eq!(forward.len(), cache.len(), "step {}", step);
        assert_eq!(forward, backward, "step {}", step);
        assert_eq!(forward[0], k, "just-fetched key is the head");

        let mut unique = forward.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), forward.len(), "no key appears twice");
    }
}

#[test]
fn test_zero_capacity_rejected() {
    let config = CacheConfig {
        capacity: 0,
        eviction_workers: 1,
    };
    let result = ContextCache::new(&config, WIDTH, InMemoryBackingStore::new());
    assert!(matches!(result, Err(crate::StorageError::Config(_))));
}
