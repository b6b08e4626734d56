//! Add command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use draper_ir::Circuit;
use draper_sim::Backend;

use super::common::{build_backend, expected_sum_bitstring, print_results};

/// Execute the add command.
pub async fn execute(bits: u32, a: u64, b: u64, shots: u32, seed: Option<u64>) -> Result<()> {
    println!(
        "{} Adding {} + {} mod 2^{} ({} shots)",
        style("→").cyan().bold(),
        style(a).green(),
        style(b).green(),
        bits,
        shots
    );

    let circuit = Circuit::draper_adder(bits, a, b)?;
    println!(
        "  Circuit: {} qubits, {} gates, depth {}",
        circuit.num_qubits(),
        circuit.gate_count(),
        circuit.depth()
    );

    let backend = build_backend(None, seed)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Running simulation...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let job_id = backend.submit(&circuit, shots).await?;
    let result = backend.wait(&job_id).await?;
    spinner.finish_and_clear();

    print_results(&result);

    let expected = expected_sum_bitstring(bits, a, b);
    match result.counts.most_frequent() {
        Some((winner, _)) if winner == expected => {
            println!(
                "\n  {} + {} ≡ {} (mod {}): {}",
                a,
                b,
                style(&expected).cyan().bold(),
                1u64 << bits,
                style("correct").green().bold()
            );
        }
        Some((winner, _)) => {
            println!(
                "\n  Expected {} but the plurality was {}",
                style(&expected).cyan(),
                style(winner).red().bold()
            );
        }
        None => anyhow::bail!("Simulation produced no counts"),
    }

    Ok(())
}
