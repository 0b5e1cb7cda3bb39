//! Beam search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Direction in which candidates are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Lowest score first.
    #[default]
    Minimize,
    /// Highest score first.
    Maximize,
}

impl Objective {
    /// Returns the objective name as snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Minimize => "minimize",
            Objective::Maximize => "maximize",
        }
    }
}

/// How a candidate is derived from its parent sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Growth {
    /// Append one symbol to the end.
    #[default]
    Append,
    /// Replace the symbol at one interior position.
    Diffusion,
}

fn default_depth() -> usize {
    2
}

fn default_iterations() -> usize {
    128
}

fn default_trim_lookahead() -> bool {
    true
}

fn default_seed() -> u64 {
    1
}

/// Configuration for the variance-pruned beam search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Recursion depth per step. Task count grows as `branching^depth`.
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Ranking direction.
    #[serde(default)]
    pub objective: Objective,

    /// Candidate derivation.
    #[serde(default)]
    pub growth: Growth,

    /// Outer iterations run by the evolution driver.
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Worker threads in the search pool. 0 means available parallelism.
    #[serde(default)]
    pub workers: usize,

    /// Keep only the first appended symbol of each step's winner.
    #[serde(default = "default_trim_lookahead")]
    pub trim_lookahead: bool,

    /// Seed for diffusion position selection and random seed input.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            objective: Objective::default(),
            growth: Growth::default(),
            iterations: default_iterations(),
            workers: 0,
            trim_lookahead: default_trim_lookahead(),
            seed: default_seed(),
        }
    }
}

impl SearchConfig {
    /// Validate search configuration values.
    ///
    /// # Errors
    /// - `CoreError::InvalidConfig` if depth is 0 or greater than 4
    pub fn validate(&self) -> CoreResult<()> {
        if self.depth == 0 {
            return Err(CoreError::invalid_config("depth must be >= 1"));
        }
        // fan-out before pruning is 256^depth
        if self.depth > 4 {
            return Err(CoreError::invalid_config(format!(
                "depth must be <= 4, got {}",
                self.depth
            )));
        }
        Ok(())
    }
}
