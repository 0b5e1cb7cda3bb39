//! Entropy scoring configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Which scoring kernel turns resolved vectors into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Importance-weighted self-entropy over query/key/value rows.
    #[default]
    SelfEntropy,
    /// Unweighted per-row entropy of `softmax(Wᵀ · softmax(W · W))`.
    Direct,
    /// Stored probability of each position's last symbol, scaled by the
    /// matched backoff level.
    MarkovProbability,
}

impl KernelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KernelKind::SelfEntropy => "self_entropy",
            KernelKind::Direct => "direct",
            KernelKind::MarkovProbability => "markov_probability",
        }
    }
}

/// Normalization applied to score rows inside the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// `exp(x - max) / Σ`
    #[default]
    Softmax,
    /// `(x²/2 + x + 1) / Σ`, a second-order Taylor stand-in for `exp`.
    Spherical,
}

/// Numeric representation of stored vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// 16-bit saturating counters.
    #[default]
    Real,
    /// Learned `Complex32` weights.
    Complex,
}

impl Representation {
    /// Returns the representation name as snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Real => "real",
            Representation::Complex => "complex",
        }
    }
}

fn default_fallback_seed() -> u64 {
    1
}

/// Scoring kernel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Kernel used by the scorer.
    #[serde(default)]
    pub kernel: KernelKind,

    /// Row normalization inside the self-entropy kernel.
    #[serde(default)]
    pub normalization: Normalization,

    /// Stored vector representation.
    #[serde(default)]
    pub representation: Representation,

    /// Seed of the generator that synthesizes fallback vectors.
    /// Reseeded per scored sequence so equal inputs score equally.
    #[serde(default = "default_fallback_seed")]
    pub fallback_seed: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            kernel: KernelKind::default(),
            normalization: Normalization::default(),
            representation: Representation::default(),
            fallback_seed: default_fallback_seed(),
        }
    }
}

impl ScoringConfig {
    /// Validate scoring configuration values.
    ///
    /// The complex representation only has a self-entropy kernel and always
    /// uses its own `x²/Σx²` normalization.
    pub fn validate(&self) -> CoreResult<()> {
        if self.representation == Representation::Complex && self.kernel != KernelKind::SelfEntropy
        {
            return Err(CoreError::invalid_config(format!(
                "representation 'complex' requires kernel 'self_entropy', got '{}'",
                self.kernel.as_str()
            )));
        }
        Ok(())
    }
}
