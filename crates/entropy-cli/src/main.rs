//! Markov self-entropy CLI
//!
//! # Commands
//!
//! - `learn`: fold corpus files into a RocksDB model
//! - `search`: grow or mutate a seed toward minimal (or maximal) self-entropy
//! - `score`: print the score of one string
//! - `inspect`: print model statistics
//!
//! Results go to stdout, logs to stderr.
//!
//! # Exit Codes
//! - 0: success
//! - 1: recoverable error (bad input, missing store, I/O)
//! - 2: the model on disk is corrupt

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;

/// Learn a byte-level Markov model and search it for low-entropy text
#[derive(Parser)]
#[command(name = "markov-entropy")]
#[command(version)]
#[command(about = "Learn a byte-level Markov model and search it for low-entropy text")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "ENTROPY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learn corpus files into the model store
    Learn(commands::learn::LearnArgs),
    /// Search for the best continuation or mutation of a seed
    Search(commands::search::SearchArgs),
    /// Score a single input
    Score(commands::score::ScoreArgs),
    /// Print model statistics
    Inspect(commands::inspect::InspectArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let exit_code = match cli.command {
        Commands::Learn(args) => commands::learn::learn_command(config, args),
        Commands::Search(args) => commands::search::search_command(config, args),
        Commands::Score(args) => commands::score::score_command(config, args),
        Commands::Inspect(args) => commands::inspect::inspect_command(config, args),
    };

    std::process::exit(exit_code);
}
