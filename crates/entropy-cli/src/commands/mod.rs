//! Subcommand handlers.
//!
//! Every handler returns the process exit code. Errors are logged to stderr
//! and mapped through [`CliError::exit_code`].

pub mod inspect;
pub mod learn;
pub mod score;
pub mod search;

use std::path::{Path, PathBuf};

use markov_entropy_core::EntropyConfig;
use markov_entropy_storage::RocksDbMarkovStore;
use tracing::{debug, error};

use crate::error::{CliExitCode, CliResult};

/// Load the config file (or defaults), apply `ENTROPY_*` overrides, then the
/// `--store` flag.
pub(crate) fn load_config(path: Option<&Path>, store: Option<&PathBuf>) -> CliResult<EntropyConfig> {
    let mut config = match path {
        Some(path) => EntropyConfig::from_file(path)?,
        None => EntropyConfig::default(),
    }
    .with_env_overrides();

    if let Some(store) = store {
        config.store.path = store.clone();
    }
    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Open the configured store. Read-only commands never create one.
pub(crate) fn open_store(config: &EntropyConfig, create: bool) -> CliResult<RocksDbMarkovStore> {
    let mut store_config = config.store.clone();
    store_config.create_if_missing = create;
    let store = RocksDbMarkovStore::open(&store_config, config.model.order)?;
    store.health_check()?;
    Ok(store)
}

/// Log a failure and turn it into an exit code.
pub(crate) fn finish(command: &str, result: CliResult<()>) -> i32 {
    match result {
        Ok(()) => CliExitCode::Success.into(),
        Err(e) => {
            let code = e.exit_code();
            error!(command, code = code as u8, "{}", e);
            eprintln!("Error: {}", e);
            code.into()
        }
    }
}

