//! Entropy scoring and beam search over a learned Markov model.
//!
//! [`EntropyScorer`] resolves every window of a sequence through the
//! multi-order lookup and reduces it to a scalar. [`BeamSearch`] expands all
//! 256 next symbols, prunes with a variance-gain [`split`], and recurses on
//! the survivors in parallel. [`SearchDriver`] feeds each winner back in as
//! the next input.

pub mod beam;
pub mod cancel;
pub mod candidate;
pub mod driver;
pub mod error;
pub mod scorer;
pub mod split;

pub use beam::{BeamSearch, Mutation};
pub use cancel::CancellationToken;
pub use candidate::SearchCandidate;
pub use driver::{random_seed_input, IterationReport, SearchDriver};
pub use error::{SearchError, SearchResult};
pub use scorer::EntropyScorer;
pub use split::split;
