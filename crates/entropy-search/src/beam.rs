//! Variance-pruned beam search.
//!
//! Each level expands every symbol of the alphabet, ranks the candidates,
//! keeps the prefix chosen by [`split`], and recurses on the survivors in
//! parallel. Children report through a channel sized to the number of
//! survivors, and the level returns the best report.

use std::sync::mpsc;

use markov_entropy_core::{Objective, ALPHABET};
use markov_entropy_storage::BackingStore;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, trace};

use crate::cancel::CancellationToken;
use crate::candidate::{better, rank, SearchCandidate};
use crate::error::{SearchError, SearchResult};
use crate::scorer::EntropyScorer;
use crate::split::split;

/// How a level derives candidates from its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Append each symbol to the end.
    Append,
    /// Overwrite the symbol at this index.
    Substitute(usize),
}

impl Mutation {
    fn apply(self, input: &[u8], symbol: u8) -> Vec<u8> {
        match self {
            Mutation::Append => {
                let mut output = Vec::with_capacity(input.len() + 1);
                output.extend_from_slice(input);
                output.push(symbol);
                output
            }
            Mutation::Substitute(index) => {
                let mut output = input.to_vec();
                output[index] = symbol;
                output
            }
        }
    }
}

/// Beam search over an [`EntropyScorer`] on a dedicated worker pool.
pub struct BeamSearch<S: BackingStore> {
    scorer: EntropyScorer<S>,
    objective: Objective,
    pool: ThreadPool,
}

impl<S: BackingStore> BeamSearch<S> {
    /// `workers == 0` sizes the pool to the available parallelism.
    pub fn new(scorer: EntropyScorer<S>, objective: Objective, workers: usize) -> SearchResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("beam-search-{}", i))
            .build()
            .map_err(|e| SearchError::Internal(format!("search pool: {}", e)))?;
        Ok(Self {
            scorer,
            objective,
            pool,
        })
    }

    pub fn scorer(&self) -> &EntropyScorer<S> {
        &self.scorer
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Best candidate reachable from `input` within `depth` mutations.
    ///
    /// # Errors
    /// - `SearchError::IndexOutOfRange` for a substitution past the end
    /// - `SearchError::Cancelled` if `cancel` fired before any result
    /// - storage failures from scoring
    pub fn search(
        &self,
        input: &[u8],
        mutation: Mutation,
        depth: usize,
        cancel: &CancellationToken,
    ) -> SearchResult<SearchCandidate> {
        if let Mutation::Substitute(index) = mutation {
            if index >= input.len() {
                return Err(SearchError::IndexOutOfRange {
                    index,
                    len: input.len(),
                });
            }
        }
        let depth = depth.max(1);
        self.pool
            .install(|| self.level(input, mutation, depth, cancel))?
            .ok_or(SearchError::Cancelled)
    }

    /// One recursion level. `Ok(None)` is the sentinel a cancelled branch
    /// reports.
    fn level(
        &self,
        input: &[u8],
        mutation: Mutation,
        depth: usize,
        cancel: &CancellationToken,
    ) -> SearchResult<Option<SearchCandidate>> {
        if cancel.is_cancelled() {
            return Ok(None);
        }

        let mut candidates = (0..ALPHABET)
            .into_par_iter()
            .map(|symbol| {
                let output = mutation.apply(input, symbol as u8);
                let entropy = self.scorer.score(&output)?;
                Ok(SearchCandidate::new(output, entropy))
            })
            .collect::<SearchResult<Vec<_>>>()?;
        rank(&mut candidates, self.objective);

        let entropies: Vec<f64> = candidates.iter().map(|c| c.entropy).collect();
        let keep = split(&entropies);
        debug!(
            depth,
            candidates = candidates.len(),
            retained = keep,
            best = candidates[0].entropy,
            "Ranked search level"
        );

        if depth <= 1 {
            return Ok(candidates.into_iter().next());
        }

        let retained = &candidates[..keep];
        let (tx, rx) = mpsc::sync_channel(retained.len());
        rayon::scope(|scope| {
            for candidate in retained {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let result = self.level(&candidate.output, mutation, depth - 1, cancel);
                    // the receiver lives until every child has reported
                    let _ = tx.send(result);
                });
            }
        });
        drop(tx);

        let mut best: Option<SearchCandidate> = None;
        let mut reports = 0;
        for result in rx.iter() {
            reports += 1;
            if let Some(candidate) = result? {
                trace!(entropy = candidate.entropy, "Child reported");
                best = Some(better(self.objective, best, candidate));
            }
        }
        if reports != retained.len() {
            return Err(SearchError::Internal(format!(
                "expected {} child reports, got {}",
                retained.len(),
                reports
            )));
        }

        Ok(best)
    }
}
