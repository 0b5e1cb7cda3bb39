//! Turns byte sequences into scalar scores.

use markov_entropy_core::{
    complex_self_entropy_kernel, direct_entropy, self_entropy_kernel, ComplexMatrix, KernelKind,
    Matrix, Representation, ScoringConfig,
};
use markov_entropy_storage::{BackingStore, MultiOrderLookup};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::SearchResult;

/// Scores candidate sequences against a learned model.
///
/// Every call reseeds the fallback generator from
/// [`ScoringConfig::fallback_seed`], so unseen contexts get the same random
/// vector in every candidate and scores are reproducible.
pub struct EntropyScorer<S: BackingStore> {
    lookup: MultiOrderLookup<S>,
    scoring: ScoringConfig,
}

impl<S: BackingStore> EntropyScorer<S> {
    /// # Errors
    /// - `SearchError::Config` if the scoring section is inconsistent
    pub fn new(lookup: MultiOrderLookup<S>, scoring: ScoringConfig) -> SearchResult<Self> {
        scoring.validate()?;
        Ok(Self { lookup, scoring })
    }

    pub fn order(&self) -> usize {
        self.lookup.order()
    }

    pub fn width(&self) -> usize {
        self.lookup.width()
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn lookup(&self) -> &MultiOrderLookup<S> {
        &self.lookup
    }

    fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.scoring.fallback_seed)
    }

    /// Scalar score with the configured kernel and representation.
    pub fn score(&self, input: &[u8]) -> SearchResult<f64> {
        match (self.scoring.representation, self.scoring.kernel) {
            (Representation::Complex, _) => self.complex_self_entropy(input),
            (Representation::Real, KernelKind::SelfEntropy) => self.self_entropy(input),
            (Representation::Real, KernelKind::Direct) => Ok(self.direct(input)?.iter().sum()),
            (Representation::Real, KernelKind::MarkovProbability) => {
                Ok(self.markov_probability(input)?.iter().sum())
            }
        }
    }

    /// Importance-weighted self-entropy of every window of `input`.
    /// Inputs shorter than the order score 0.
    pub fn self_entropy(&self, input: &[u8]) -> SearchResult<f64> {
        let order = self.order();
        let positions = self.lookup.resolve_sequence(input, &mut self.rng())?;
        if positions.is_empty() {
            return Ok(0.0);
        }

        let importance: Vec<f64> = positions
            .iter()
            .map(|p| p.level.importance(order))
            .collect();
        let vectors: Vec<&[f64]> = positions.iter().map(|p| p.vector.as_slice()).collect();
        let weights = Matrix::from_rows(self.width(), &vectors);

        Ok(self_entropy_kernel(
            &weights,
            &weights,
            &weights,
            &importance,
            self.scoring.normalization,
        ))
    }

    /// Unweighted per-window entropy.
    pub fn direct(&self, input: &[u8]) -> SearchResult<Vec<f64>> {
        let positions = self.lookup.resolve_sequence(input, &mut self.rng())?;
        if positions.is_empty() {
            return Ok(Vec::new());
        }
        let vectors: Vec<&[f64]> = positions.iter().map(|p| p.vector.as_slice()).collect();
        Ok(direct_entropy(&Matrix::from_rows(self.width(), &vectors)))
    }

    /// Per window: the stored weight of the window's last symbol times the
    /// matched confidence. Unseen windows contribute 0.
    pub fn markov_probability(&self, input: &[u8]) -> SearchResult<Vec<f64>> {
        let order = self.order();
        let positions = self.lookup.resolve_sequence(input, &mut self.rng())?;
        Ok(positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let last = input[i + order - 1] as usize;
                p.vector[last] * p.level.confidence(order)
            })
            .collect())
    }

    /// Complex self-entropy; the real part of the accumulated score.
    pub fn complex_self_entropy(&self, input: &[u8]) -> SearchResult<f64> {
        let order = self.order();
        let positions = self
            .lookup
            .resolve_complex_sequence(input, &mut self.rng())?;
        if positions.is_empty() {
            return Ok(0.0);
        }

        let importance: Vec<f64> = positions
            .iter()
            .map(|p| p.level.importance(order))
            .collect();
        let rows: Vec<&[_]> = positions.iter().map(|p| p.vector.as_slice()).collect();
        let weights = ComplexMatrix::from_rows(self.width(), &rows);

        Ok(complex_self_entropy_kernel(
            &weights,
            &weights,
            &weights,
            &importance,
        ))
    }
}
