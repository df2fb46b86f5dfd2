use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid device selector '{0}'. Expected 'cpu', 'cuda' or 'cuda:<index>'.")]
pub struct DeviceParseError(pub String);

/// Compute device the driver is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda(u32),
}

impl Default for Device {
    fn default() -> Self {
        Device::Cuda(0)
    }
}

impl FromStr for Device {
    type Err = DeviceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|idx| idx.parse().ok())
                .map(Device::Cuda)
                .ok_or_else(|| DeviceParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Cuda(idx) => write!(f, "cuda:{idx}"),
        }
    }
}

/// Hyperparameters of the driver's staged optimization schedule.
///
/// The stages run in order: a warm-up pass at a reduced learning rate, then
/// logits, soft, temperature and hard rounds, then a handful of semi-greedy
/// steps. Zero iterations skips a stage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct OptimizationParams {
    pub learning_rate: f64,
    pub warmup_learning_rate: f64,
    pub warmup_iterations: usize,
    pub logits_iterations: usize,
    pub soft_iterations: usize,
    pub temp_iterations: usize,
    pub hard_iterations: usize,
    pub semi_greedy_steps: usize,
    pub recycling_steps: usize,
}

impl Default for OptimizationParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            warmup_learning_rate: 0.05,
            warmup_iterations: 30,
            logits_iterations: 50,
            soft_iterations: 75,
            temp_iterations: 45,
            hard_iterations: 5,
            semi_greedy_steps: 2,
            recycling_steps: 0,
        }
    }
}

impl OptimizationParams {
    pub(crate) fn validate(&self) -> Result<(), super::DesignError> {
        for (name, rate) in [
            ("learning-rate", self.learning_rate),
            ("warmup-learning-rate", self.warmup_learning_rate),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(super::DesignError::InvalidLearningRate { name, value: rate });
            }
        }
        Ok(())
    }
}

/// Binder/target contact geometry the driver optimizes toward.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct InteractionParams {
    /// Number of inter-chain contacts requested per binder position.
    pub inter_chain_contacts: usize,
    /// Distance cutoff for binder/target contacts, in Å.
    pub inter_chain_cutoff: f64,
    /// Distance cutoff for contacts within the binder, in Å.
    pub intra_chain_cutoff: f64,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            inter_chain_contacts: 2,
            inter_chain_cutoff: 20.0,
            intra_chain_cutoff: 14.0,
        }
    }
}

impl InteractionParams {
    pub(crate) fn validate(&self) -> Result<(), super::DesignError> {
        for (name, cutoff) in [
            ("inter-chain-cutoff", self.inter_chain_cutoff),
            ("intra-chain-cutoff", self.intra_chain_cutoff),
        ] {
            if !cutoff.is_finite() || cutoff <= 0.0 {
                return Err(super::DesignError::InvalidCutoff {
                    name,
                    value: cutoff,
                });
            }
        }
        Ok(())
    }
}
