//! `inspect`: print model statistics.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use super::{finish, load_config, open_store};
use crate::error::CliResult;

/// Arguments for `inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Model store directory
    #[arg(long, env = "ENTROPY_STORE_PATH")]
    pub store: Option<PathBuf>,
}

pub fn inspect_command(config: Option<&Path>, args: InspectArgs) -> i32 {
    debug!(?args, "inspect_command");
    finish("inspect", run(config, &args))
}

fn run(config_path: Option<&Path>, args: &InspectArgs) -> CliResult<()> {
    let config = load_config(config_path, args.store.as_ref())?;
    config.validate()?;

    let store = open_store(&config, false)?;
    println!("path\t{}", store.path());
    println!("order\t{}", store.order());
    println!("contexts\t{}", store.keys()?.len());
    Ok(())
}
