//! High-level circuit builder API.

use std::f64::consts::PI;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A quantum circuit.
///
/// A circuit is an ordered list of instructions over a fixed set of qubits
/// and classical bits. The builder methods validate operands on every
/// append, so a constructed circuit is always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// The instruction sequence, in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.qubits.len() as u32);
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = QubitId(self.qubits.len() as u32);
            self.qubits.push(Qubit::with_register(id, &name, i));
            ids.push(id);
        }
        ids
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.clbits.len() as u32);
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = ClbitId(self.clbits.len() as u32);
            self.clbits.push(Clbit::with_register(id, &name, i));
            ids.push(id);
        }
        ids
    }

    /// Append an instruction, validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<()> {
        let gate_name = || Some(instruction.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for (i, qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 as usize >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit: *qubit,
                    gate_name: gate_name(),
                });
            }
            if instruction.qubits[..i].contains(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit: *qubit,
                    gate_name: gate_name(),
                });
            }
        }

        for clbit in &instruction.clbits {
            if clbit.0 as usize >= self.clbits.len() {
                return Err(IrError::ClbitNotFound {
                    clbit: *clbit,
                    gate_name: gate_name(),
                });
            }
        }

        self.instructions.push(instruction);
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))?;
        Ok(self)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))?;
        Ok(self)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))?;
        Ok(self)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::T, qubit))?;
        Ok(self)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))?;
        Ok(self)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))?;
        Ok(self)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))?;
        Ok(self)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))?;
        Ok(self)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))?;
        Ok(self)
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CP(theta), control, target))?;
        Ok(self)
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure all qubits to corresponding classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }

        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits: Vec<_> = self.clbits.iter().map(|c| c.id).take(qubits.len()).collect();

        self.apply(Instruction::measure_all(qubits, clbits)?)?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of gate instructions (barriers and measurements excluded).
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Check whether the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Get the circuit depth by greedy layering.
    ///
    /// Barriers synchronize their qubits but do not count as a layer.
    pub fn depth(&self) -> usize {
        let num_wires = self.qubits.len() + self.clbits.len();
        let mut levels = vec![0usize; num_wires];
        let clbit_base = self.qubits.len();

        for inst in &self.instructions {
            let wires: Vec<usize> = inst
                .qubits
                .iter()
                .map(|q| q.0 as usize)
                .chain(inst.clbits.iter().map(|c| clbit_base + c.0 as usize))
                .collect();
            let front = wires.iter().map(|&w| levels[w]).max().unwrap_or(0);
            let next = if inst.is_barrier() { front } else { front + 1 };
            for &w in &wires {
                levels[w] = next;
            }
        }

        levels.into_iter().max().unwrap_or(0)
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Get the adjoint of this circuit.
    ///
    /// Instructions are reversed and each gate inverted. Fails if the
    /// circuit contains measurements.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let mut inverted = Circuit::with_size(
            format!("{}_dag", self.name),
            self.qubits.len() as u32,
            self.clbits.len() as u32,
        );
        for inst in self.instructions.iter().rev() {
            inverted.apply(inst.inverse()?)?;
        }
        Ok(inverted)
    }

    /// Append another circuit's instructions to this one.
    ///
    /// The other circuit must not use more qubits or clbits than this one.
    pub fn extend(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        for inst in other.instructions() {
            self.apply(inst.clone())?;
        }
        Ok(self)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a QFT circuit.
    ///
    /// Qubit 0 is the least significant bit. With `do_swaps = false` the
    /// output is bit-reversed, which is the variant the Draper adder
    /// composes with: after the transform, qubit `t` carries the relative
    /// phase `2π·x / 2^(t+1)` of the input value `x`.
    pub fn qft(n: u32, do_swaps: bool) -> IrResult<Self> {
        if n == 0 {
            return Err(IrError::ZeroWidth);
        }

        let mut circuit = Self::with_size(format!("qft_{n}"), n, 0);

        for t in (0..n).rev() {
            circuit.h(QubitId(t))?;
            for c in (0..t).rev() {
                let k = t - c;
                let angle = PI / (1u64 << k) as f64;
                circuit.cp(angle, QubitId(c), QubitId(t))?;
            }
        }

        if do_swaps {
            for i in 0..n / 2 {
                circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
            }
        }

        Ok(circuit)
    }

    /// Create an inverse QFT circuit: the exact adjoint of [`Circuit::qft`].
    pub fn iqft(n: u32, do_swaps: bool) -> IrResult<Self> {
        let mut inverted = Self::qft(n, do_swaps)?.inverse()?;
        inverted.set_name(format!("iqft_{n}"));
        Ok(inverted)
    }

    /// Create a Draper adder circuit computing `(a + b) mod 2^n`.
    ///
    /// Register layout: qubits `0..n` hold `a`, qubits `n..2n` hold `b`,
    /// LSB first in both. The circuit encodes the inputs with X gates,
    /// moves `b` into the Fourier basis, adds `a` bit-by-bit with
    /// controlled phase rotations `CP(2π / 2^(t−c+1))`, transforms back,
    /// and measures the `b` register into clbits `0..n`. Overflow wraps
    /// modulo `2^n` for free — the phases are only defined modulo 2π.
    pub fn draper_adder(n: u32, a: u64, b: u64) -> IrResult<Self> {
        if n == 0 {
            return Err(IrError::ZeroWidth);
        }
        if n < 64 && a >> n != 0 {
            return Err(IrError::ValueTooWide { value: a, bits: n });
        }
        if n < 64 && b >> n != 0 {
            return Err(IrError::ValueTooWide { value: b, bits: n });
        }

        let mut circuit = Self::new(format!("draper_adder_{n}"));
        let areg = circuit.add_qreg("a", n);
        let breg = circuit.add_qreg("b", n);
        let sum = circuit.add_creg("sum", n);

        // Encode the classical inputs.
        for bit in 0..n {
            if a >> bit & 1 == 1 {
                circuit.x(areg[bit as usize])?;
            }
            if b >> bit & 1 == 1 {
                circuit.x(breg[bit as usize])?;
            }
        }
        circuit.barrier_all()?;

        // b into the Fourier basis (bit-reversed variant, no swaps).
        let qft = Self::qft(n, false)?;
        for inst in qft.instructions() {
            let mut shifted = inst.clone();
            for q in &mut shifted.qubits {
                *q = breg[q.0 as usize];
            }
            circuit.apply(shifted)?;
        }

        // Phase-add a onto b: control a-bit c, target b-bit t, c <= t.
        // Contributions from c > t are multiples of 2π and drop out.
        for t in 0..n {
            for c in 0..=t {
                let angle = PI / (1u64 << (t - c)) as f64;
                circuit.cp(angle, areg[c as usize], breg[t as usize])?;
            }
        }

        // Back to the computational basis.
        let iqft = Self::iqft(n, false)?;
        for inst in iqft.instructions() {
            let mut shifted = inst.clone();
            for q in &mut shifted.qubits {
                *q = breg[q.0 as usize];
            }
            circuit.apply(shifted)?;
        }

        circuit.barrier_all()?;
        for bit in 0..n {
            circuit.measure(breg[bit as usize], sum[bit as usize])?;
        }

        Ok(circuit)
    }

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let qreg = circuit.add_qreg("q", 4);
        let creg = circuit.add_creg("c", 4);

        assert_eq!(qreg.len(), 4);
        assert_eq!(creg.len(), 4);
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_clbits(), 4);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
    }

    #[test]
    fn test_apply_rejects_unknown_qubit() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        let result = circuit.h(QubitId(5));
        assert!(matches!(result, Err(IrError::QubitNotFound { .. })));
    }

    #[test]
    fn test_apply_rejects_duplicate_qubit() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let result = circuit.cx(QubitId(0), QubitId(0));
        assert!(matches!(result, Err(IrError::DuplicateQubit { .. })));
    }

    #[test]
    fn test_qft_gate_count() {
        // n Hadamards + n(n-1)/2 controlled phases, plus swaps if requested.
        let qft = Circuit::qft(4, false).unwrap();
        assert_eq!(qft.gate_count(), 4 + 6);

        let qft_swapped = Circuit::qft(4, true).unwrap();
        assert_eq!(qft_swapped.gate_count(), 4 + 6 + 2);
    }

    #[test]
    fn test_qft_zero_width() {
        assert!(matches!(Circuit::qft(0, false), Err(IrError::ZeroWidth)));
    }

    #[test]
    fn test_iqft_mirrors_qft() {
        let qft = Circuit::qft(3, false).unwrap();
        let iqft = Circuit::iqft(3, false).unwrap();

        assert_eq!(qft.gate_count(), iqft.gate_count());

        let forward: Vec<_> = qft.instructions().iter().collect();
        let backward: Vec<_> = iqft.instructions().iter().rev().collect();
        for (f, b) in forward.iter().zip(backward.iter()) {
            assert_eq!(f.qubits, b.qubits);
            assert_eq!(
                f.as_gate().unwrap().inverse(),
                *b.as_gate().unwrap()
            );
        }
    }

    #[test]
    fn test_inverse_rejects_measurements() {
        let circuit = Circuit::bell().unwrap();
        assert!(matches!(circuit.inverse(), Err(IrError::NonUnitary(_))));
    }

    #[test]
    fn test_adder_structure() {
        let circuit = Circuit::draper_adder(3, 5, 2).unwrap();
        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.num_clbits(), 3);
        assert!(circuit.has_measurements());

        // X encoding: 5 = 101 (two bits) + 2 = 010 (one bit).
        let x_count = circuit
            .instructions()
            .iter()
            .filter(|i| i.as_gate() == Some(&StandardGate::X))
            .count();
        assert_eq!(x_count, 3);
    }

    #[test]
    fn test_adder_preserves_a_register() {
        // Register a is only ever an X target (encoding) or a CP control.
        let circuit = Circuit::draper_adder(3, 7, 1).unwrap();
        let n = 3u32;
        for inst in circuit.instructions() {
            let Some(gate) = inst.as_gate() else { continue };
            match gate {
                StandardGate::X => {}
                StandardGate::CP(_) => {
                    // Phase targets must never be in register a.
                    assert!(inst.qubits[1].0 >= n);
                }
                StandardGate::H => assert!(inst.qubits[0].0 >= n),
                _ => {}
            }
        }
    }

    #[test]
    fn test_adder_rejects_wide_inputs() {
        assert!(matches!(
            Circuit::draper_adder(3, 8, 0),
            Err(IrError::ValueTooWide { value: 8, bits: 3 })
        ));
        assert!(matches!(
            Circuit::draper_adder(2, 1, 4),
            Err(IrError::ValueTooWide { value: 4, bits: 2 })
        ));
        assert!(matches!(
            Circuit::draper_adder(0, 0, 0),
            Err(IrError::ZeroWidth)
        ));
    }

    #[test]
    fn test_extend() {
        let mut base = Circuit::with_size("base", 3, 0);
        let qft = Circuit::qft(3, false).unwrap();
        base.extend(&qft).unwrap();
        assert_eq!(base.gate_count(), qft.gate_count());
    }
}
