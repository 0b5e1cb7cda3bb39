//! Outer evolution loop: repeatedly search from the previous winner.

use markov_entropy_core::{Growth, SearchConfig};
use markov_entropy_storage::BackingStore;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::beam::{BeamSearch, Mutation};
use crate::cancel::CancellationToken;
use crate::candidate::SearchCandidate;
use crate::error::{SearchError, SearchResult};
use crate::scorer::EntropyScorer;

/// One completed outer iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// Zero-based iteration number.
    pub iteration: usize,
    /// Position mutated in diffusion mode.
    pub index: Option<usize>,
    pub candidate: SearchCandidate,
}

/// Drives [`BeamSearch`] for a fixed number of iterations.
///
/// - Append growth: the seed is left-padded with `order - 2` zero bytes, each
///   iteration searches `depth` symbols ahead and, with `trim_lookahead`,
///   commits only the first of them.
/// - Diffusion growth: each iteration overwrites one seeded-random position
///   inside the unpadded seed span with its best symbol (depth 1).
pub struct SearchDriver<S: BackingStore> {
    beam: BeamSearch<S>,
    config: SearchConfig,
}

impl<S: BackingStore> SearchDriver<S> {
    pub fn new(scorer: EntropyScorer<S>, config: &SearchConfig) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self {
            beam: BeamSearch::new(scorer, config.objective, config.workers)?,
            config: *config,
        })
    }

    pub fn beam(&self) -> &BeamSearch<S> {
        &self.beam
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Seed with `order - 2` leading zero bytes.
    pub fn pad(&self, seed: &[u8]) -> Vec<u8> {
        let padding = self.beam.scorer().order().saturating_sub(2);
        let mut padded = vec![0u8; padding];
        padded.extend_from_slice(seed);
        padded
    }

    /// Run every iteration, calling `on_iteration` after each one, and
    /// return the final winner.
    ///
    /// Cancellation between iterations returns the last completed winner;
    /// cancellation before the first completes is `SearchError::Cancelled`.
    pub fn run<F>(
        &self,
        seed: &[u8],
        cancel: &CancellationToken,
        mut on_iteration: F,
    ) -> SearchResult<SearchCandidate>
    where
        F: FnMut(&IterationReport),
    {
        let iterations = self.config.iterations.max(1);
        let mut current = self.pad(seed);
        let mut last: Option<SearchCandidate> = None;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let offset = self.beam.scorer().order().saturating_sub(2);

        if self.config.growth == Growth::Diffusion && seed.is_empty() {
            return Err(SearchError::EmptySeed);
        }

        for iteration in 0..iterations {
            if cancel.is_cancelled() {
                break;
            }

            let (candidate, index) = match self.config.growth {
                Growth::Append => {
                    let mut candidate =
                        self.beam
                            .search(&current, Mutation::Append, self.config.depth, cancel)?;
                    if self.config.trim_lookahead {
                        candidate.output.truncate(current.len() + 1);
                    }
                    (candidate, None)
                }
                Growth::Diffusion => {
                    let index = offset + rng.gen_range(0..seed.len());
                    let candidate =
                        self.beam
                            .search(&current, Mutation::Substitute(index), 1, cancel)?;
                    (candidate, Some(index))
                }
            };

            info!(
                iteration,
                entropy = candidate.entropy,
                len = candidate.output.len(),
                "Search iteration complete"
            );
            let report = IterationReport {
                iteration,
                index,
                candidate,
            };
            on_iteration(&report);

            current = report.candidate.output.clone();
            last = Some(report.candidate);
        }

        last.ok_or(SearchError::Cancelled)
    }
}

/// `len` random lowercase ASCII letters, reproducible for a given seed.
pub fn random_seed_input(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z')).collect()
}
