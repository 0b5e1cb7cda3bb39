//! `learn`: fold corpus files into the model store.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use markov_entropy_storage::{BackingStore, ComplexLearner, CounterLearner};
use tracing::{debug, info};

use super::{finish, load_config, open_store};
use crate::error::{CliError, CliResult};

/// Arguments for `learn`
#[derive(Args, Debug)]
pub struct LearnArgs {
    /// Corpus files or directories (directories are walked recursively)
    #[arg(long, required = true, num_args = 1..)]
    pub corpus: Vec<PathBuf>,

    /// Model store directory
    #[arg(long, env = "ENTROPY_STORE_PATH")]
    pub store: Option<PathBuf>,

    /// Learn the complex-valued model instead of frequency counters
    #[arg(long)]
    pub complex: bool,
}

pub fn learn_command(config: Option<&Path>, args: LearnArgs) -> i32 {
    debug!(?args, "learn_command");
    finish("learn", run(config, &args))
}

fn run(config_path: Option<&Path>, args: &LearnArgs) -> CliResult<()> {
    let config = load_config(config_path, args.store.as_ref())?;
    config.validate()?;

    let files = collect_files(&args.corpus)?;
    info!(files = files.len(), store = %config.store.path.display(), "Learning corpus");
    let store = open_store(&config, true)?;

    if args.complex {
        let mut learner = ComplexLearner::new(&config.model, config.search.seed)?;
        for file in &files {
            learner.learn(&read(file)?)?;
        }
        let written = learner.persist(&store)?;
        println!("documents\t{}", files.len());
        println!("contexts\t{}", written);
    } else {
        let mut learner = CounterLearner::new(&config.model, &config.cache, store)?;
        for file in &files {
            learner.learn(&read(file)?)?;
        }
        let documents = learner.documents();
        let positions = learner.positions();
        let store = learner.finish()?;
        println!("documents\t{}", documents);
        println!("positions\t{}", positions);
        println!("contexts\t{}", store.len()?);
    }
    Ok(())
}

fn read(path: &Path) -> CliResult<Vec<u8>> {
    fs::read(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> CliError {
    CliError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Expand directories into the regular files beneath them, in path order.
fn collect_files(roots: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = roots.to_vec();
    pending.reverse();

    while let Some(path) = pending.pop() {
        let metadata = fs::metadata(&path).map_err(|e| io_error(&path, e))?;
        if metadata.is_file() {
            files.push(path);
        } else if metadata.is_dir() {
            let mut children = fs::read_dir(&path)
                .map_err(|e| io_error(&path, e))?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| io_error(&path, e))?;
            children.sort();
            children.reverse();
            pending.extend(children);
        }
    }

    if files.is_empty() {
        return Err(CliError::Usage("corpus contains no regular files".to_string()));
    }
    Ok(files)
}
