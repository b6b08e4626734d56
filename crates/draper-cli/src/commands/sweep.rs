//! Sweep command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use draper_ir::Circuit;
use draper_sim::{Backend, NoiseSpec};

use super::common::{build_backend, expected_sum_bitstring};

/// Execute the sweep command: check every n-bit input pair.
pub async fn execute(
    bits: u32,
    shots: u32,
    error_rate: Option<f64>,
    seed: Option<u64>,
) -> Result<()> {
    let modulus = 1u64 << bits;
    let total_pairs = modulus * modulus;

    println!(
        "{} Sweeping all {} input pairs for {}-bit addition ({} shots each)",
        style("→").cyan().bold(),
        total_pairs,
        bits,
        shots
    );
    if let Some(p) = error_rate {
        println!("  depolarizing error rate: {p:.4}");
    }

    let noise = error_rate.map(NoiseSpec::depolarizing);
    let backend = build_backend(noise, seed)?;

    let bar = ProgressBar::new(total_pairs);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap(),
    );

    let mut failures = Vec::new();
    for a in 0..modulus {
        for b in 0..modulus {
            let circuit = Circuit::draper_adder(bits, a, b)?;
            let job_id = backend.submit(&circuit, shots).await?;
            let result = backend.result(&job_id).await?;

            let expected = expected_sum_bitstring(bits, a, b);
            let winner = result
                .counts
                .most_frequent()
                .map(|(s, _)| s.to_string())
                .unwrap_or_default();
            if winner != expected {
                failures.push((a, b, expected, winner));
            }
            bar.inc(1);
        }
    }
    bar.finish_and_clear();

    if failures.is_empty() {
        println!(
            "\n{} All {} pairs produced the correct plurality sum",
            style("✓").green().bold(),
            total_pairs
        );
    } else {
        println!(
            "\n{} {}/{} pairs failed:",
            style("✗").red().bold(),
            failures.len(),
            total_pairs
        );
        for (a, b, expected, got) in failures.iter().take(16) {
            println!(
                "  {a} + {b}: expected {} got {}",
                style(expected).cyan(),
                style(got).red()
            );
        }
        if failures.len() > 16 {
            println!("  ... and {} more", failures.len() - 16);
        }
        anyhow::bail!("Sweep failed for {} input pairs", failures.len());
    }

    Ok(())
}
