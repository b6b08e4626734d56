//! Noise channel models and trajectory sampling.
//!
//! The simulator uses Monte-Carlo trajectory sampling: instead of evolving
//! a density matrix, each shot samples one concrete error realization. For
//! a Pauli channel that means drawing one of {I, X, Y, Z} after each noisy
//! gate, per touched qubit, and averaging over shots.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A single sampled Pauli error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauliError {
    /// Bit flip.
    X,
    /// Bit and phase flip.
    Y,
    /// Phase flip.
    Z,
}

/// A noise channel model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
#[non_exhaustive]
pub enum NoiseModel {
    /// Depolarizing channel: with probability `p`, applies a uniformly
    /// random Pauli error (p/3 each for X, Y, Z).
    Depolarizing {
        /// Error probability (0.0 to 1.0).
        p: f64,
    },

    /// Bit-flip channel: applies X with probability `p`.
    BitFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },

    /// Phase-flip channel: applies Z with probability `p`.
    PhaseFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },
}

impl NoiseModel {
    /// Get a human-readable name for this noise model.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseModel::Depolarizing { .. } => "depolarizing",
            NoiseModel::BitFlip { .. } => "bit_flip",
            NoiseModel::PhaseFlip { .. } => "phase_flip",
        }
    }

    /// Get the error parameter of this noise model.
    pub fn error_param(&self) -> f64 {
        match self {
            NoiseModel::Depolarizing { p }
            | NoiseModel::BitFlip { p }
            | NoiseModel::PhaseFlip { p } => *p,
        }
    }

    /// Check the error parameter is a probability.
    pub fn validate(&self) -> SimResult<()> {
        let p = self.error_param();
        if !(0.0..=1.0).contains(&p) {
            return Err(SimError::InvalidNoise(format!(
                "{}: probability must be in [0, 1], got {p}",
                self.name()
            )));
        }
        Ok(())
    }

    /// Sample one error realization from this channel.
    ///
    /// `None` means the identity (no error). Depolarizing uses cumulative
    /// thresholds 1−p, 1−p+p/3, 1−p+2p/3 over a single uniform draw.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PauliError> {
        let r: f64 = rng.r#gen();
        match self {
            NoiseModel::Depolarizing { p } => {
                if r < 1.0 - p {
                    None
                } else if r < 1.0 - p + p / 3.0 {
                    Some(PauliError::X)
                } else if r < 1.0 - p + 2.0 * p / 3.0 {
                    Some(PauliError::Y)
                } else {
                    Some(PauliError::Z)
                }
            }
            NoiseModel::BitFlip { p } => (r < *p).then_some(PauliError::X),
            NoiseModel::PhaseFlip { p } => (r < *p).then_some(PauliError::Z),
        }
    }
}

impl std::fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoiseModel::Depolarizing { p } => write!(f, "depolarizing(p={p:.4})"),
            NoiseModel::BitFlip { p } => write!(f, "bit_flip(p={p:.4})"),
            NoiseModel::PhaseFlip { p } => write!(f, "phase_flip(p={p:.4})"),
        }
    }
}

/// Noise specification for a simulation run.
///
/// Gate errors are keyed by arity — two-qubit gates are typically an order
/// of magnitude noisier than single-qubit ones on real devices. Readout
/// error flips each measured bit independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    /// Channel applied after every single-qubit gate.
    #[serde(default)]
    pub one_qubit: Option<NoiseModel>,
    /// Channel applied after every two-qubit gate (per touched qubit).
    #[serde(default)]
    pub two_qubit: Option<NoiseModel>,
    /// Probability of misreading each measured bit.
    #[serde(default)]
    pub readout_error: f64,
}

impl NoiseSpec {
    /// Uniform depolarizing noise on all gates, no readout error.
    pub fn depolarizing(p: f64) -> Self {
        Self {
            one_qubit: Some(NoiseModel::Depolarizing { p }),
            two_qubit: Some(NoiseModel::Depolarizing { p }),
            readout_error: 0.0,
        }
    }

    /// Set the readout error probability.
    #[must_use]
    pub fn with_readout_error(mut self, p: f64) -> Self {
        self.readout_error = p;
        self
    }

    /// Channel for a gate of the given arity, if any.
    pub fn channel_for_arity(&self, num_qubits: usize) -> Option<&NoiseModel> {
        if num_qubits >= 2 {
            self.two_qubit.as_ref()
        } else {
            self.one_qubit.as_ref()
        }
    }

    /// Check whether this spec describes a noiseless run.
    pub fn is_noiseless(&self) -> bool {
        self.one_qubit.is_none() && self.two_qubit.is_none() && self.readout_error == 0.0
    }

    /// Validate all parameters.
    pub fn validate(&self) -> SimResult<()> {
        if let Some(model) = &self.one_qubit {
            model.validate()?;
        }
        if let Some(model) = &self.two_qubit {
            model.validate()?;
        }
        if !(0.0..=1.0).contains(&self.readout_error) {
            return Err(SimError::InvalidNoise(format!(
                "readout error must be in [0, 1], got {}",
                self.readout_error
            )));
        }
        Ok(())
    }
}
