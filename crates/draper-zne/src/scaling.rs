//! Noise scaling by unitary folding.
//!
//! Folding inserts pairs `G†G` that are logical identities but double the
//! physical gate count they touch. Running the same circuit at several
//! fold levels exposes how an expectation value decays with noise, which
//! is the raw material for extrapolating back to the zero-noise limit.

use draper_ir::{Circuit, Instruction};
use tracing::debug;

use crate::error::{ZneError, ZneResult};

/// A circuit scaled to an amplified noise level.
#[derive(Debug, Clone)]
pub struct ScaledCircuit {
    /// The folded circuit, measurements intact at the end.
    pub circuit: Circuit,
    /// The factor that was requested.
    pub requested_factor: f64,
    /// The factor actually realized.
    ///
    /// Folding is quantized to whole gate pairs, so the achieved factor
    /// is the nearest realizable value `((2k+1)·d + 2s) / d`. Fits should
    /// use this value, not the requested one.
    pub achieved_factor: f64,
}

/// Strategy for amplifying the effective noise of a circuit.
pub trait NoiseScaling: Send + Sync {
    /// Get a human-readable name for this strategy.
    fn name(&self) -> &'static str;

    /// Produce a circuit whose noise is scaled by roughly `factor`.
    fn scale(&self, circuit: &Circuit, factor: f64) -> ZneResult<ScaledCircuit>;
}

/// Split a circuit into its unitary body and trailing measurements.
///
/// Barriers are scheduling hints with no unitary content; they are not
/// folded and are dropped from the scaled circuit.
fn partition(circuit: &Circuit) -> (Vec<Instruction>, Vec<Instruction>) {
    let gates = circuit
        .instructions()
        .iter()
        .filter(|i| i.is_gate())
        .cloned()
        .collect();
    let tail = circuit
        .instructions()
        .iter()
        .filter(|i| i.is_measure())
        .cloned()
        .collect();
    (gates, tail)
}

/// Number of whole folds `k` and residual gate count `s` realizing the
/// closest achievable factor to `factor` for a body of `d` gates.
fn fold_counts(d: usize, factor: f64) -> (usize, usize) {
    let k = ((factor - 1.0) / 2.0).floor() as usize;
    let s = ((d as f64) * (factor - 1.0 - 2.0 * k as f64) / 2.0).round() as usize;
    (k, s.min(d))
}

fn achieved(d: usize, k: usize, s: usize) -> f64 {
    ((2 * k + 1) * d + 2 * s) as f64 / d as f64
}

fn validate(circuit: &Circuit, factor: f64) -> ZneResult<usize> {
    if factor < 1.0 || !factor.is_finite() {
        return Err(ZneError::InvalidScaleFactor(factor));
    }
    let d = circuit.gate_count();
    if d == 0 {
        return Err(ZneError::NothingToFold(circuit.name().to_string()));
    }
    Ok(d)
}

fn rebuild(
    circuit: &Circuit,
    factor: f64,
    body: Vec<Instruction>,
    tail: Vec<Instruction>,
) -> ZneResult<Circuit> {
    let mut folded = Circuit::with_size(
        format!("{}_x{factor:.2}", circuit.name()),
        circuit.num_qubits() as u32,
        circuit.num_clbits() as u32,
    );
    for inst in body.into_iter().chain(tail) {
        folded.apply(inst)?;
    }
    Ok(folded)
}

/// Global folding: `C → C (C†C)^k`, with the last `s` gates of the body
/// folded once more to hit fractional factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalFolding;

impl NoiseScaling for GlobalFolding {
    fn name(&self) -> &'static str {
        "global"
    }

    fn scale(&self, circuit: &Circuit, factor: f64) -> ZneResult<ScaledCircuit> {
        let d = validate(circuit, factor)?;
        let (gates, tail) = partition(circuit);
        let (k, s) = fold_counts(d, factor);

        let mut body = gates.clone();
        for _ in 0..k {
            for gate in gates.iter().rev() {
                body.push(gate.inverse()?);
            }
            body.extend(gates.iter().cloned());
        }
        // Partial fold over the last s gates.
        let residual = &gates[d - s..];
        for gate in residual.iter().rev() {
            body.push(gate.inverse()?);
        }
        body.extend(residual.iter().cloned());

        let achieved_factor = achieved(d, k, s);
        debug!(
            "global fold: d={}, k={}, s={}, requested={:.3}, achieved={:.3}",
            d, k, s, factor, achieved_factor
        );

        Ok(ScaledCircuit {
            circuit: rebuild(circuit, factor, body, tail)?,
            requested_factor: factor,
            achieved_factor,
        })
    }
}

/// Gate folding: every gate `G → G (G†G)^k`, with the first `s` gates of
/// the body folded once more to hit fractional factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateFolding;

impl NoiseScaling for GateFolding {
    fn name(&self) -> &'static str {
        "gate"
    }

    fn scale(&self, circuit: &Circuit, factor: f64) -> ZneResult<ScaledCircuit> {
        let d = validate(circuit, factor)?;
        let (gates, tail) = partition(circuit);
        let (k, s) = fold_counts(d, factor);

        let mut body = Vec::with_capacity((2 * k + 1) * d + 2 * s);
        for (i, gate) in gates.iter().enumerate() {
            body.push(gate.clone());
            let folds = k + usize::from(i < s);
            for _ in 0..folds {
                body.push(gate.inverse()?);
                body.push(gate.clone());
            }
        }

        let achieved_factor = achieved(d, k, s);
        debug!(
            "gate fold: d={}, k={}, s={}, requested={:.3}, achieved={:.3}",
            d, k, s, factor, achieved_factor
        );

        Ok(ScaledCircuit {
            circuit: rebuild(circuit, factor, body, tail)?,
            requested_factor: factor,
            achieved_factor,
        })
    }
}
