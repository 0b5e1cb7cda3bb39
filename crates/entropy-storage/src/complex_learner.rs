//! Learning pass for the complex-valued model.
//!
//! Each context owns a vector of `Width` complex weights. A position is
//! encoded as a sparse phase vector (the current symbol at phase 0, each
//! following symbol `j` at phase `πj/order`), and the weights are nudged so
//! the dot product with that encoding moves toward 1.

use std::collections::HashMap;
use std::f64::consts::PI;

use markov_entropy_core::{ModelConfig, SymbolContext};
use num_complex::{Complex32, Complex64};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::info;

use crate::backing::BackingStore;
use crate::codec;
use crate::error::StorageResult;

/// Learning rate.
pub const ETA: f64 = 0.1;

/// Blobs per `put_batch` call in [`ComplexLearner::persist`].
const PERSIST_BATCH: usize = 4096;

/// In-memory complex model builder.
pub struct ComplexLearner {
    vectors: HashMap<SymbolContext, Vec<Complex32>>,
    order: usize,
    width: usize,
    rng: ChaCha8Rng,
}

impl ComplexLearner {
    pub fn new(model: &ModelConfig, seed: u64) -> StorageResult<Self> {
        model.validate()?;
        Ok(Self {
            vectors: HashMap::new(),
            order: model.order,
            width: model.width,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Learn one document. Documents shorter than the order are skipped.
    pub fn learn(&mut self, data: &[u8]) -> StorageResult<()> {
        let order = self.order;
        if data.len() < order {
            return Ok(());
        }

        let phases: Vec<Complex64> = (0..order)
            .map(|j| Complex64::new(0.0, PI * j as f64 / order as f64).exp())
            .collect();

        let mut context = SymbolContext::zeroed(order)?;
        let mut inputs = vec![Complex64::new(0.0, 0.0); self.width];
        for i in 0..=data.len() - order {
            let symbol = data[i];

            inputs.iter_mut().for_each(|x| *x = Complex64::new(0.0, 0.0));
            inputs[symbol as usize] = phases[0];
            for j in 1..order {
                inputs[data[i + j] as usize] = phases[j];
            }

            for level in 0..order - 1 {
                let key = context.masked(level);
                let width = self.width;
                let rng = &mut self.rng;
                let weights = self
                    .vectors
                    .entry(key)
                    .or_insert_with(|| random_weights(rng, width));
                update(weights, &inputs);
            }
            context.push(symbol);
        }
        Ok(())
    }

    /// Write every vector to `store`, in key order.
    pub fn persist<S: BackingStore + ?Sized>(&self, store: &S) -> StorageResult<usize> {
        let mut keys: Vec<&SymbolContext> = self.vectors.keys().collect();
        keys.sort();

        for chunk in keys.chunks(PERSIST_BATCH) {
            let batch = chunk
                .iter()
                .map(|&key| (*key, codec::pack_complex(&self.vectors[key])))
                .collect();
            store.put_batch(batch)?;
        }
        store.flush()?;

        info!(contexts = keys.len(), "Persisted complex model");
        Ok(keys.len())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, key: &SymbolContext) -> Option<&[Complex32]> {
        self.vectors.get(key).map(Vec::as_slice)
    }
}

/// He-style complex noise: real and imaginary parts `N(0,1) · sqrt(2/width)`.
fn random_weights<R: Rng + ?Sized>(rng: &mut R, width: usize) -> Vec<Complex32> {
    let factor = (2.0 / width as f64).sqrt();
    (0..width)
        .map(|_| {
            let re: f64 = StandardNormal.sample(rng);
            let im: f64 = StandardNormal.sample(rng);
            Complex32::new((re * factor) as f32, (im * factor) as f32)
        })
        .collect()
}

/// `w -= η · x · (x·w − 1)²`
fn update(weights: &mut [Complex32], inputs: &[Complex64]) {
    let y: Complex64 = inputs
        .iter()
        .zip(weights.iter())
        .map(|(x, w)| x * Complex64::new(w.re as f64, w.im as f64))
        .sum();
    let error = (y - 1.0) * (y - 1.0);
    for (w, x) in weights.iter_mut().zip(inputs) {
        if x.re == 0.0 && x.im == 0.0 {
            continue;
        }
        let delta = x * error * ETA;
        *w -= Complex32::new(delta.re as f32, delta.im as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::InMemoryBackingStore;

    fn model() -> ModelConfig {
        ModelConfig {
            order: 3,
            width: 256,
        }
    }

    #[test]
    fn test_update_touches_only_active_symbols() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let original = random_weights(&mut rng, 8);
        let mut weights = original.clone();
        let mut inputs = vec![Complex64::new(0.0, 0.0); 8];
        inputs[1] = Complex64::new(1.0, 0.0);
        inputs[4] = Complex64::new(0.0, PI / 3.0).exp();

        update(&mut weights, &inputs);

        for i in [0, 2, 3, 5, 6, 7] {
            assert_eq!(weights[i], original[i], "index {} should be untouched", i);
        }
        assert_ne!(weights[1], original[1]);
        assert_ne!(weights[4], original[4]);
    }

    #[test]
    fn test_update_is_noop_at_target() {
        let mut weights = vec![Complex32::new(0.0, 0.0); 4];
        weights[2] = Complex32::new(1.0, 0.0);
        let mut inputs = vec![Complex64::new(0.0, 0.0); 4];
        inputs[2] = Complex64::new(1.0, 0.0);

        update(&mut weights, &inputs);
        assert_eq!(weights[2], Complex32::new(1.0, 0.0));
    }

    #[test]
    fn test_learn_is_deterministic_per_seed() {
        let mut a = ComplexLearner::new(&model(), 7).unwrap();
        let mut b = ComplexLearner::new(&model(), 7).unwrap();
        a.learn(b"hello world").unwrap();
        b.learn(b"hello world").unwrap();

        let key = SymbolContext::from_slice(&[0, 0, 0]).unwrap();
        assert_eq!(a.get(&key), b.get(&key));
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_persist_round_trip() {
        let mut learner = ComplexLearner::new(&model(), 3).unwrap();
        learner.learn(b"abcabcabc").unwrap();
        let store = InMemoryBackingStore::new();

        let written = learner.persist(&store).unwrap();
        assert_eq!(written, learner.len());

        let key = SymbolContext::from_slice(b"abc").unwrap();
        let blob = store.get(&key).unwrap().expect("stored");
        let decoded = codec::unpack_complex(key.as_bytes(), &blob, 256).unwrap();
        assert_eq!(Some(decoded.as_slice()), learner.get(&key));
    }
}
