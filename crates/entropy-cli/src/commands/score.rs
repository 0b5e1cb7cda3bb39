//! `score`: print the score of one string.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use markov_entropy_core::{EntropyConfig, KernelKind, Normalization, Representation};
use markov_entropy_search::EntropyScorer;
use markov_entropy_storage::{MultiOrderLookup, RocksDbMarkovStore};
use tracing::debug;

use super::{finish, load_config, open_store};
use crate::error::CliResult;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KernelArg {
    SelfEntropy,
    Direct,
    MarkovProbability,
}

impl From<KernelArg> for KernelKind {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::SelfEntropy => KernelKind::SelfEntropy,
            KernelArg::Direct => KernelKind::Direct,
            KernelArg::MarkovProbability => KernelKind::MarkovProbability,
        }
    }
}

/// Scoring overrides shared by `score` and `search`.
#[derive(Args, Debug)]
pub struct ScoringArgs {
    /// Scoring kernel
    #[arg(long, value_enum)]
    pub kernel: Option<KernelArg>,

    /// Use spherical softmax instead of softmax
    #[arg(long)]
    pub spherical: bool,

    /// Score against a complex-valued model
    #[arg(long)]
    pub complex: bool,
}

impl ScoringArgs {
    pub(crate) fn apply(&self, config: &mut EntropyConfig) {
        if let Some(kernel) = self.kernel {
            config.scoring.kernel = kernel.into();
        }
        if self.spherical {
            config.scoring.normalization = Normalization::Spherical;
        }
        if self.complex {
            config.scoring.representation = Representation::Complex;
        }
    }
}

/// Arguments for `score`
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Text to score
    #[arg(long)]
    pub input: String,

    /// Model store directory
    #[arg(long, env = "ENTROPY_STORE_PATH")]
    pub store: Option<PathBuf>,

    #[command(flatten)]
    pub scoring: ScoringArgs,
}

pub fn score_command(config: Option<&Path>, args: ScoreArgs) -> i32 {
    debug!(?args, "score_command");
    finish("score", run(config, &args))
}

/// Open the store read-only and wrap it in a scorer.
pub(crate) fn build_scorer(config: &EntropyConfig) -> CliResult<EntropyScorer<RocksDbMarkovStore>> {
    let store = open_store(config, false)?;
    let lookup = MultiOrderLookup::new(store, &config.model);
    Ok(EntropyScorer::new(lookup, config.scoring)?)
}

fn run(config_path: Option<&Path>, args: &ScoreArgs) -> CliResult<()> {
    let mut config = load_config(config_path, args.store.as_ref())?;
    args.scoring.apply(&mut config);
    config.validate()?;

    let scorer = build_scorer(&config)?;
    let score = scorer.score(args.input.as_bytes())?;
    println!("{:.6}\t{}", score, args.input);
    Ok(())
}
