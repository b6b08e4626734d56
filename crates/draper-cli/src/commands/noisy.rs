//! Noisy command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use draper_ir::Circuit;
use draper_sim::{Backend, NoiseSpec, Observable};

use super::common::{build_backend, expected_sum_bitstring, load_noise_profile, print_results};

/// Execute the noisy command.
#[allow(clippy::too_many_arguments)]
pub async fn execute(
    bits: u32,
    a: u64,
    b: u64,
    shots: u32,
    error_rate: f64,
    noise_profile: Option<&str>,
    readout_error: Option<f64>,
    seed: Option<u64>,
) -> Result<()> {
    let mut noise = match noise_profile {
        Some(path) => {
            println!(
                "{} Noise profile: {}",
                style("→").cyan().bold(),
                style(path).yellow()
            );
            load_noise_profile(path)?
        }
        None => NoiseSpec::depolarizing(error_rate),
    };
    if let Some(p) = readout_error {
        noise = noise.with_readout_error(p);
    }

    println!(
        "{} Adding {} + {} mod 2^{} under noise ({} shots)",
        style("→").cyan().bold(),
        style(a).green(),
        style(b).green(),
        bits,
        shots
    );
    if let Some(model) = &noise.one_qubit {
        println!("  1q channel: {model}");
    }
    if let Some(model) = &noise.two_qubit {
        println!("  2q channel: {model}");
    }
    if noise.readout_error > 0.0 {
        println!("  readout error: {:.4}", noise.readout_error);
    }

    let circuit = Circuit::draper_adder(bits, a, b)?;
    let backend = build_backend(Some(noise), seed)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Running noisy simulation...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let job_id = backend.submit(&circuit, shots).await?;
    let result = backend.wait(&job_id).await?;
    spinner.finish_and_clear();

    print_results(&result);

    let expected = expected_sum_bitstring(bits, a, b);
    let p_success = Observable::Projector(expected.clone()).expectation(&result.counts);
    println!(
        "\n  P(correct sum {}) = {}",
        style(&expected).cyan(),
        style(format!("{p_success:.4}")).bold()
    );

    Ok(())
}
