//! End-to-end mitigation runs against the noisy simulator.

use async_trait::async_trait;
use draper_ir::Circuit;
use draper_sim::{Backend, NoiseSpec, Observable, SimulatorBackend};
use draper_zne::{
    Executor, FnExecutor, GlobalFolding, LinearExtrapolator, RichardsonExtrapolator, ZneError,
    ZneResult, mitigated_expectation,
};

/// Executor that runs circuits on a seeded noisy simulator and reports
/// the expectation of a fixed observable.
struct NoisySimExecutor {
    error_rate: f64,
    observable: Observable,
    shots: u32,
}

#[async_trait]
impl Executor for NoisySimExecutor {
    async fn execute(&self, circuit: &Circuit) -> ZneResult<f64> {
        let backend = SimulatorBackend::new()
            .with_noise(NoiseSpec::depolarizing(self.error_rate))
            .map_err(|e| ZneError::Executor(e.to_string()))?
            .with_seed(41);
        let job_id = backend
            .submit(circuit, self.shots)
            .await
            .map_err(|e| ZneError::Executor(e.to_string()))?;
        let result = backend
            .result(&job_id)
            .await
            .map_err(|e| ZneError::Executor(e.to_string()))?;
        Ok(self.observable.expectation(&result.counts))
    }
}

#[tokio::test]
async fn mitigation_improves_noisy_adder_estimate() {
    let circuit = Circuit::draper_adder(2, 2, 3).unwrap();
    let executor = NoisySimExecutor {
        error_rate: 0.008,
        observable: Observable::Projector("01".to_string()), // (2+3) mod 4 = 1
        shots: 4000,
    };

    let report = mitigated_expectation(
        &circuit,
        &executor,
        &GlobalFolding,
        &LinearExtrapolator,
        &[1.0, 2.0, 3.0],
    )
    .await
    .unwrap();

    // The unmitigated value is the measurement at scale factor 1.
    let unmitigated = report.expectation_values[0];
    let ideal = 1.0;

    assert!(unmitigated < ideal, "noise must depress the raw value");
    assert!(
        (report.mitigated - ideal).abs() < (unmitigated - ideal).abs(),
        "mitigated {:.4} should beat raw {:.4}",
        report.mitigated,
        unmitigated
    );
}

#[tokio::test]
async fn expectation_values_decay_with_scale_factor() {
    let circuit = Circuit::draper_adder(2, 1, 2).unwrap();
    let executor = NoisySimExecutor {
        error_rate: 0.01,
        observable: Observable::Projector("11".to_string()), // (1+2) mod 4 = 3
        shots: 4000,
    };

    let report = mitigated_expectation(
        &circuit,
        &executor,
        &GlobalFolding,
        &RichardsonExtrapolator,
        &[1.0, 3.0, 5.0],
    )
    .await
    .unwrap();

    // More folding means more noise means lower success probability.
    assert!(report.expectation_values[0] > report.expectation_values[2]);
    assert_eq!(report.achieved_factors, vec![1.0, 3.0, 5.0]);
}

#[tokio::test]
async fn mock_executor_with_exact_linear_decay_recovers_ideal() {
    // With a perfectly linear decay the extrapolation is exact; whole
    // scale factors keep folding quantization out of the picture.
    let circuit = Circuit::draper_adder(2, 0, 1).unwrap();
    let executor = FnExecutor::new(|scaled: Circuit| async move {
        Ok::<_, ZneError>(1.0 - 0.002 * scaled.gate_count() as f64)
    });

    let report = mitigated_expectation(
        &circuit,
        &executor,
        &GlobalFolding,
        &RichardsonExtrapolator,
        &[1.0, 3.0, 5.0],
    )
    .await
    .unwrap();

    assert!((report.mitigated - 1.0).abs() < 1e-9);
}
