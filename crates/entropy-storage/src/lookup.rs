//! Multi-order backoff lookup over a backing store.
//!
//! A full-length context is probed at levels `0..order-1`, level `j` having
//! its `j` oldest positions zeroed. The first stored blob wins. When nothing
//! matches, a seeded random unit vector stands in at level `order - 1`.

use markov_entropy_core::matrix::complex::complex_normalize_in_place;
use markov_entropy_core::matrix::normalize_in_place;
use markov_entropy_core::{ModelConfig, SymbolContext};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::warn;

use crate::backing::BackingStore;
use crate::codec;
use crate::error::StorageResult;

/// Which backoff level satisfied a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLevel {
    /// A stored vector was found with this many oldest positions masked.
    Level(usize),
    /// Nothing was stored at any level.
    Fallback,
}

impl MatchLevel {
    /// Effective level, treating the fallback as fully masked (`order - 1`).
    pub fn level(self, order: usize) -> usize {
        match self {
            MatchLevel::Level(level) => level,
            MatchLevel::Fallback => order - 1,
        }
    }

    /// Scoring weight `1 / (order - level)`.
    pub fn importance(self, order: usize) -> f64 {
        1.0 / (order - self.level(order)) as f64
    }

    /// `order - level` for stored matches, 0 for the fallback.
    pub fn confidence(self, order: usize) -> f64 {
        match self {
            MatchLevel::Level(level) => (order - level) as f64,
            MatchLevel::Fallback => 0.0,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, MatchLevel::Fallback)
    }
}

/// A unit-norm real vector and the level that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub vector: Vec<f64>,
    pub level: MatchLevel,
}

/// A complex-normalized vector and the level that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexResolved {
    pub vector: Vec<Complex64>,
    pub level: MatchLevel,
}

/// Backoff lookup over a read-only store.
///
/// Safe to share across search workers when `S` is: every read goes straight
/// to the store, which owns its own synchronization.
pub struct MultiOrderLookup<S: BackingStore> {
    store: S,
    order: usize,
    width: usize,
}

impl<S: BackingStore> MultiOrderLookup<S> {
    pub fn new(store: S, model: &ModelConfig) -> Self {
        Self {
            store,
            order: model.order,
            width: model.width,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// First stored blob along the backoff chain, with its level.
    ///
    /// # Errors
    /// Store read failures only; a miss at every level is `Ok(None)`.
    pub fn probe(&self, context: &SymbolContext) -> StorageResult<Option<(usize, Vec<u8>)>> {
        for level in 0..self.order - 1 {
            let key = context.masked(level);
            if let Some(blob) = self.store.get(&key)? {
                return Ok(Some((level, blob)));
            }
        }
        Ok(None)
    }

    /// Resolve `context` to a unit-norm counter vector.
    ///
    /// A blob that fails to decode is logged and treated like a miss, so a
    /// corrupt record degrades one position to the fallback instead of
    /// failing the whole score.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        context: &SymbolContext,
        rng: &mut R,
    ) -> StorageResult<Resolved> {
        if let Some((level, blob)) = self.probe(context)? {
            match codec::unpack_counts(context.masked(level).as_bytes(), &blob, self.width) {
                Ok(counts) => {
                    return Ok(Resolved {
                        vector: counts.unit_normalized(),
                        level: MatchLevel::Level(level),
                    })
                }
                Err(e) => warn!(error = %e, level, "Stored vector failed to decode, using fallback"),
            }
        }
        Ok(Resolved {
            vector: self.fallback(rng),
            level: MatchLevel::Fallback,
        })
    }

    /// Resolve `context` against a complex-valued model.
    pub fn resolve_complex<R: Rng + ?Sized>(
        &self,
        context: &SymbolContext,
        rng: &mut R,
    ) -> StorageResult<ComplexResolved> {
        if let Some((level, blob)) = self.probe(context)? {
            match codec::unpack_complex(context.masked(level).as_bytes(), &blob, self.width) {
                Ok(values) => {
                    let mut vector: Vec<Complex64> = values
                        .iter()
                        .map(|v| Complex64::new(v.re as f64, v.im as f64))
                        .collect();
                    complex_normalize_in_place(&mut vector);
                    return Ok(ComplexResolved {
                        vector,
                        level: MatchLevel::Level(level),
                    });
                }
                Err(e) => warn!(error = %e, level, "Stored complex vector failed to decode, using fallback"),
            }
        }
        Ok(ComplexResolved {
            vector: self.complex_fallback(rng),
            level: MatchLevel::Fallback,
        })
    }

    /// Resolve every `order`-wide window of `input`, in order.
    ///
    /// Inputs shorter than the order yield no positions.
    pub fn resolve_sequence<R: Rng + ?Sized>(
        &self,
        input: &[u8],
        rng: &mut R,
    ) -> StorageResult<Vec<Resolved>> {
        if input.len() < self.order {
            return Ok(Vec::new());
        }
        (0..=input.len() - self.order)
            .map(|i| {
                let context = SymbolContext::window(input, i, self.order)?;
                self.resolve(&context, rng)
            })
            .collect()
    }

    /// Complex counterpart of [`Self::resolve_sequence`].
    pub fn resolve_complex_sequence<R: Rng + ?Sized>(
        &self,
        input: &[u8],
        rng: &mut R,
    ) -> StorageResult<Vec<ComplexResolved>> {
        if input.len() < self.order {
            return Ok(Vec::new());
        }
        (0..=input.len() - self.order)
            .map(|i| {
                let context = SymbolContext::window(input, i, self.order)?;
                self.resolve_complex(&context, rng)
            })
            .collect()
    }

    /// Uniform `[0, 1)` components scaled to unit length.
    fn fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let mut vector: Vec<f64> = (0..self.width).map(|_| rng.gen::<f64>()).collect();
        normalize_in_place(&mut vector);
        vector
    }

    /// Complex normal noise scaled by `sqrt(2/width)`, then normalized.
    fn complex_fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Complex64> {
        let factor = (2.0 / self.width as f64).sqrt();
        let mut vector: Vec<Complex64> = (0..self.width)
            .map(|_| {
                let re: f64 = StandardNormal.sample(rng);
                let im: f64 = StandardNormal.sample(rng);
                Complex64::new(re * factor, im * factor)
            })
            .collect();
        complex_normalize_in_place(&mut vector);
        vector
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use markov_entropy_core::CacheConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::backing::InMemoryBackingStore;
    use crate::learner::CounterLearner;

    fn model() -> ModelConfig {
        ModelConfig {
            order: 4,
            width: 256,
        }
    }

    fn learned(text: &[u8]) -> MultiOrderLookup<Arc<InMemoryBackingStore>> {
        let store = Arc::new(InMemoryBackingStore::new());
        let cache = CacheConfig {
            capacity: 256,
            eviction_workers: 1,
        };
        let mut learner = CounterLearner::new(&model(), &cache, Arc::clone(&store)).unwrap();
        learner.learn(text).unwrap();
        learner.finish().unwrap();
        MultiOrderLookup::new(store, &model())
    }

    #[test]
    fn test_exact_match_is_level_zero() {
        let lookup = learned(b"abcdefgh");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let context = SymbolContext::from_slice(b"abcd").unwrap();

        let resolved = lookup.resolve(&context, &mut rng).unwrap();
        assert_eq!(resolved.level, MatchLevel::Level(0));
        let norm: f64 = resolved.vector.iter().map(|x| x * x).sum();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_backoff_to_masked_context() {
        let lookup = learned(b"abcdefgh");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // "zbcd" was never seen, but [0,b,c,d] was recorded at level 1
        let context = SymbolContext::from_slice(b"zbcd").unwrap();

        let resolved = lookup.resolve(&context, &mut rng).unwrap();
        assert_eq!(resolved.level, MatchLevel::Level(1));
    }

    #[test]
    fn test_unseen_context_falls_back() {
        let lookup = learned(b"abcdefgh");
        let context = SymbolContext::from_slice(b"wxyz").unwrap();

        let a = lookup
            .resolve(&context, &mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();
        let b = lookup
            .resolve(&context, &mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();

        assert!(a.level.is_fallback());
        assert_eq!(a, b, "fallback is deterministic per seed");
        let norm: f64 = a.vector.iter().map(|x| x * x).sum();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_corrupt_blob_degrades_to_fallback() {
        let store = Arc::new(InMemoryBackingStore::new());
        let key = SymbolContext::from_slice(b"abcd").unwrap();
        store.put(key, vec![0xff, 0xff]).unwrap();
        let lookup = MultiOrderLookup::new(store, &model());

        let resolved = lookup
            .resolve(&key, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert!(resolved.level.is_fallback());
    }

    #[test]
    fn test_weights() {
        let order = 4;
        assert_eq!(MatchLevel::Level(0).importance(order), 0.25);
        assert_eq!(MatchLevel::Level(2).importance(order), 0.5);
        assert_eq!(MatchLevel::Fallback.importance(order), 1.0);

        assert_eq!(MatchLevel::Level(0).confidence(order), 4.0);
        assert_eq!(MatchLevel::Fallback.confidence(order), 0.0);
    }

    #[test]
    fn test_resolve_sequence_windows() {
        let lookup = learned(b"abcdefgh");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(lookup.resolve_sequence(b"abc", &mut rng).unwrap().is_empty());
        let positions = lookup.resolve_sequence(b"abcdef", &mut rng).unwrap();
        assert_eq!(positions.len(), 3);
    }
}
