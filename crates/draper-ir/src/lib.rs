//! Draper Circuit Representation
//!
//! This crate provides the data structures for representing the quantum
//! circuits used in the Draper-adder experiments: a small gate alphabet,
//! validated instructions, and a fluent [`Circuit`] builder with the
//! QFT, inverse-QFT, and adder constructors.
//!
//! # Overview
//!
//! A circuit is an ordered instruction list over a fixed set of qubits and
//! classical bits. There is no optimization layer — circuits are built
//! once and handed to a simulator (or to the folding transforms in the
//! mitigation crate) as-is.
//!
//! # Example: Adding Two Integers
//!
//! ```rust
//! use draper_ir::Circuit;
//!
//! // 3-bit adder computing (5 + 2) mod 8
//! let circuit = Circuit::draper_adder(3, 5, 2).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 6);   // two 3-bit registers
//! assert_eq!(circuit.num_clbits(), 3);   // the measured sum
//! ```
//!
//! # Qubit ordering
//!
//! Qubit 0 is the least significant bit of its register everywhere in this
//! crate. The adder lays out register `a` on qubits `0..n` and register `b`
//! on qubits `n..2n`; the sum is measured from `b` into clbits `0..n`.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
