//! Zne command implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use draper_ir::Circuit;
use draper_sim::{Backend, NoiseSpec, Observable, SimulatorBackend};
use draper_zne::{
    Executor, Extrapolator, GateFolding, GlobalFolding, LinearExtrapolator, NoiseScaling,
    PolynomialExtrapolator, RichardsonExtrapolator, ZneError, ZneReport, ZneResult,
    mitigated_expectation,
};

use super::common::expected_sum_bitstring;

/// Seed for the n-th execution of a seeded run. Each scale factor gets an
/// independent stream; the base seed keeps the whole run reproducible.
fn scale_seed(base: u64, call: u64) -> u64 {
    base.wrapping_add(call.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// The measured expectation at λ = 1, if one was requested.
fn unmitigated_value(report: &ZneReport) -> Option<f64> {
    report
        .achieved_factors
        .iter()
        .position(|&f| (f - 1.0).abs() < 1e-9)
        .map(|i| report.expectation_values[i])
}

/// Executor evaluating the success-probability observable on a noisy
/// simulator.
struct SuccessProbExecutor {
    noise: NoiseSpec,
    observable: Observable,
    shots: u32,
    seed: Option<u64>,
    calls: AtomicU64,
}

#[async_trait]
impl Executor for SuccessProbExecutor {
    async fn execute(&self, circuit: &Circuit) -> ZneResult<f64> {
        let mut backend = SimulatorBackend::new()
            .with_noise(self.noise)
            .map_err(|e| ZneError::Executor(e.to_string()))?;
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(seed) = self.seed {
            backend = backend.with_seed(scale_seed(seed, call));
        }
        let job_id = backend
            .submit(circuit, self.shots)
            .await
            .map_err(|e| ZneError::Executor(e.to_string()))?;
        let result = backend
            .wait(&job_id)
            .await
            .map_err(|e| ZneError::Executor(e.to_string()))?;
        Ok(self.observable.expectation(&result.counts))
    }
}

/// Execute the zne command.
#[allow(clippy::too_many_arguments)]
pub async fn execute(
    bits: u32,
    a: u64,
    b: u64,
    shots: u32,
    error_rate: f64,
    scale_factors: &[f64],
    method: &str,
    degree: usize,
    scaling: &str,
    export: Option<&str>,
    seed: Option<u64>,
) -> Result<()> {
    let extrapolator: Box<dyn Extrapolator> = match method.to_lowercase().as_str() {
        "richardson" => Box::new(RichardsonExtrapolator),
        "linear" => Box::new(LinearExtrapolator),
        "polynomial" | "poly" => Box::new(PolynomialExtrapolator::new(degree)),
        other => {
            anyhow::bail!("Unknown method: '{other}'. Available: richardson, linear, polynomial");
        }
    };

    let scaling_impl: Box<dyn NoiseScaling> = match scaling.to_lowercase().as_str() {
        "global" => Box::new(GlobalFolding),
        "gate" | "local" => Box::new(GateFolding),
        other => {
            anyhow::bail!("Unknown scaling: '{other}'. Available: global, gate");
        }
    };

    println!(
        "{} ZNE for {} + {} mod 2^{}: {} folding, {} extrapolation",
        style("→").cyan().bold(),
        style(a).green(),
        style(b).green(),
        bits,
        style(scaling_impl.name()).yellow(),
        style(extrapolator.name()).yellow()
    );
    println!(
        "  error rate {:.4}, {} shots per scale factor",
        error_rate, shots
    );

    let circuit = Circuit::draper_adder(bits, a, b)?;
    let expected = expected_sum_bitstring(bits, a, b);
    let executor = SuccessProbExecutor {
        noise: NoiseSpec::depolarizing(error_rate),
        observable: Observable::Projector(expected.clone()),
        shots,
        seed,
        calls: AtomicU64::new(0),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!(
        "Measuring at {} scale factors...",
        scale_factors.len()
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = mitigated_expectation(
        &circuit,
        &executor,
        scaling_impl.as_ref(),
        extrapolator.as_ref(),
        scale_factors,
    )
    .await?;
    spinner.finish_and_clear();

    println!("\n{} Expectation values:", style("✓").green().bold());
    for ((requested, achieved), value) in report
        .scale_factors
        .iter()
        .zip(&report.achieved_factors)
        .zip(&report.expectation_values)
    {
        println!(
            "  λ = {:>5.2} (achieved {:>5.2}): P(correct) = {:.4}",
            requested, achieved, value
        );
    }
    match unmitigated_value(&report) {
        Some(value) => println!("\n  Unmitigated: {}", style(format!("{value:.4}")).bold()),
        None => println!(
            "\n  At λ = {:.2}:   {}",
            report.achieved_factors[0],
            style(format!("{:.4}", report.expectation_values[0])).bold()
        ),
    }
    println!(
        "  Mitigated:   {}",
        style(format!("{:.4}", report.mitigated)).green().bold()
    );

    if let Some(path) = export {
        let json = serde_json::to_string_pretty(&report)?;
        if path == "-" {
            println!("\n{json}");
        } else {
            std::fs::write(path, json)?;
            println!("\n  Report written to {}", style(path).yellow());
        }
    }

    Ok(())
}
