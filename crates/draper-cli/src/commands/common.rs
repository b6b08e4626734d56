//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use draper_sim::{ExecutionResult, NoiseSpec, SimulatorBackend};

/// Load a noise specification from a YAML file.
pub fn load_noise_profile(path: &str) -> Result<NoiseSpec> {
    let path_obj = Path::new(path);
    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let spec: NoiseSpec = serde_yaml_ng::from_str(&source)
        .with_context(|| format!("Invalid noise profile: {path}"))?;
    Ok(spec)
}

/// Construct a simulator, optionally noisy and/or seeded.
pub fn build_backend(noise: Option<NoiseSpec>, seed: Option<u64>) -> Result<SimulatorBackend> {
    let mut backend = SimulatorBackend::new();
    if let Some(noise) = noise {
        backend = backend.with_noise(noise)?;
    }
    if let Some(seed) = seed {
        backend = backend.with_seed(seed);
    }
    Ok(backend)
}

/// The bitstring the adder should produce for `(a + b) mod 2^bits`.
pub fn expected_sum_bitstring(bits: u32, a: u64, b: u64) -> String {
    let modulus = 1u64 << bits;
    format!("{:0width$b}", (a + b) % modulus, width = bits as usize)
}

/// Print execution results in a table format (shared by add, noisy, sweep).
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some(time_ms) = result.execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_sum_wraps() {
        assert_eq!(expected_sum_bitstring(3, 3, 5), "000");
        assert_eq!(expected_sum_bitstring(3, 2, 3), "101");
        assert_eq!(expected_sum_bitstring(4, 9, 12), "0101");
    }
}
