//! `search`: evolve a seed toward minimal or maximal self-entropy.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use markov_entropy_core::{Growth, Objective};
use markov_entropy_search::{random_seed_input, CancellationToken, SearchDriver};
use tracing::{debug, info};

use super::score::{build_scorer, ScoringArgs};
use super::{finish, load_config};
use crate::error::{CliError, CliResult};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ObjectiveArg {
    Minimize,
    Maximize,
}

impl From<ObjectiveArg> for Objective {
    fn from(arg: ObjectiveArg) -> Self {
        match arg {
            ObjectiveArg::Minimize => Objective::Minimize,
            ObjectiveArg::Maximize => Objective::Maximize,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GrowthArg {
    Append,
    Diffusion,
}

impl From<GrowthArg> for Growth {
    fn from(arg: GrowthArg) -> Self {
        match arg {
            GrowthArg::Append => Growth::Append,
            GrowthArg::Diffusion => Growth::Diffusion,
        }
    }
}

/// Arguments for `search`
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Seed text
    #[arg(long, required_unless_present = "random_seed")]
    pub input: Option<String>,

    /// Replace the seed with this many random lowercase letters
    #[arg(long, conflicts_with = "input")]
    pub random_seed: Option<usize>,

    /// Recursion depth per iteration
    #[arg(long)]
    pub depth: Option<usize>,

    #[arg(long, value_enum)]
    pub objective: Option<ObjectiveArg>,

    #[arg(long, value_enum)]
    pub growth: Option<GrowthArg>,

    /// Outer iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Search worker threads (0 = available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Keep every symbol of each append step's lookahead
    #[arg(long)]
    pub no_trim: bool,

    /// Model store directory
    #[arg(long, env = "ENTROPY_STORE_PATH")]
    pub store: Option<PathBuf>,

    #[command(flatten)]
    pub scoring: ScoringArgs,
}

pub fn search_command(config: Option<&Path>, args: SearchArgs) -> i32 {
    debug!(?args, "search_command");
    finish("search", run(config, &args))
}

fn run(config_path: Option<&Path>, args: &SearchArgs) -> CliResult<()> {
    let mut config = load_config(config_path, args.store.as_ref())?;
    args.scoring.apply(&mut config);
    if let Some(depth) = args.depth {
        config.search.depth = depth;
    }
    if let Some(objective) = args.objective {
        config.search.objective = objective.into();
    }
    if let Some(growth) = args.growth {
        config.search.growth = growth.into();
    }
    if let Some(iterations) = args.iterations {
        config.search.iterations = iterations;
    }
    if let Some(workers) = args.workers {
        config.search.workers = workers;
    }
    if args.no_trim {
        config.search.trim_lookahead = false;
    }
    config.validate()?;

    let seed = match (&args.input, args.random_seed) {
        (_, Some(len)) => random_seed_input(len, config.search.seed),
        (Some(input), None) => input.as_bytes().to_vec(),
        (None, None) => {
            return Err(CliError::Usage(
                "--input or --random-seed is required".to_string(),
            ))
        }
    };
    info!(
        seed = %String::from_utf8_lossy(&seed),
        depth = config.search.depth,
        objective = config.search.objective.as_str(),
        "Starting search"
    );

    let driver = SearchDriver::new(build_scorer(&config)?, &config.search)?;
    let best = driver.run(&seed, &CancellationToken::new(), |report| {
        println!(
            "{:.6}\t{}",
            report.candidate.entropy,
            report.candidate.printable()
        );
    })?;
    info!(entropy = best.entropy, "Search finished");
    Ok(())
}
