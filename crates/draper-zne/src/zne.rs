//! The mitigation driver: scale, execute, extrapolate.

use draper_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ZneError, ZneResult};
use crate::executor::Executor;
use crate::extrapolate::Extrapolator;
use crate::scaling::NoiseScaling;

/// Record of one zero-noise-extrapolation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZneReport {
    /// Name of the measured circuit.
    pub circuit: String,
    /// Noise scaling strategy used.
    pub scaling_method: String,
    /// Extrapolation method used.
    pub extrapolation_method: String,
    /// The scale factors as requested.
    pub scale_factors: Vec<f64>,
    /// The scale factors actually realized by folding.
    pub achieved_factors: Vec<f64>,
    /// Measured expectation values, one per scale factor.
    pub expectation_values: Vec<f64>,
    /// The extrapolated zero-noise estimate.
    pub mitigated: f64,
}

/// Run zero-noise extrapolation for one circuit.
///
/// For each scale factor the circuit is folded, handed to the executor,
/// and the measured expectation recorded. The extrapolator then fits the
/// (achieved factor, value) pairs and evaluates at zero.
pub async fn mitigated_expectation(
    circuit: &Circuit,
    executor: &dyn Executor,
    scaling: &dyn NoiseScaling,
    extrapolator: &dyn Extrapolator,
    scale_factors: &[f64],
) -> ZneResult<ZneReport> {
    if scale_factors.is_empty() {
        return Err(ZneError::NoScaleFactors);
    }

    let mut achieved_factors = Vec::with_capacity(scale_factors.len());
    let mut expectation_values = Vec::with_capacity(scale_factors.len());

    for &factor in scale_factors {
        let scaled = scaling.scale(circuit, factor)?;
        let value = executor.execute(&scaled.circuit).await?;
        debug!(
            "scale {:.3} (achieved {:.3}): expectation {:.6}",
            factor, scaled.achieved_factor, value
        );
        achieved_factors.push(scaled.achieved_factor);
        expectation_values.push(value);
    }

    let mitigated = extrapolator.extrapolate(&achieved_factors, &expectation_values)?;
    info!(
        "{} + {} mitigation for '{}': {:.6}",
        scaling.name(),
        extrapolator.name(),
        circuit.name(),
        mitigated
    );

    Ok(ZneReport {
        circuit: circuit.name().to_string(),
        scaling_method: scaling.name().to_string(),
        extrapolation_method: extrapolator.name().to_string(),
        scale_factors: scale_factors.to_vec(),
        achieved_factors,
        expectation_values,
        mitigated,
    })
}
