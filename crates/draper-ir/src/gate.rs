//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
///
/// The alphabet is deliberately small: what the QFT-based adder emits plus
/// the Paulis the noisy simulator injects. Rotation angles are concrete
/// `f64` radians — every angle in the adder comes from a closed form, so
/// there is no symbolic parameter layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// SWAP gate.
    Swap,
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Controlled phase gate.
    CP(f64),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::Swap => "swap",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CP(_) => "cp",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rz(_)
            | StandardGate::P(_) => 1,

            StandardGate::Swap | StandardGate::CX | StandardGate::CZ | StandardGate::CP(_) => 2,
        }
    }

    /// Get the adjoint of this gate.
    ///
    /// Unitary folding builds `G G† G` sequences, so every gate in the
    /// alphabet must know its inverse.
    #[inline]
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::Rz(theta) => StandardGate::Rz(-theta),
            StandardGate::P(theta) => StandardGate::P(-theta),
            StandardGate::CP(theta) => StandardGate::CP(-theta),
            // Self-inverse gates
            g => *g,
        }
    }

    /// Check if this gate is its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        self.inverse() == *self
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandardGate::Rz(theta) => write!(f, "rz({theta:.6})"),
            StandardGate::P(theta) => write!(f, "p({theta:.6})"),
            StandardGate::CP(theta) => write!(f, "cp({theta:.6})"),
            g => write!(f, "{}", g.name()),
        }
    }
}
