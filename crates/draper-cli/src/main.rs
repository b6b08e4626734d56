//! Draper Command-Line Interface
//!
//! The main entry point for the `draper` CLI tool: build and run QFT-based
//! adder circuits on a local simulator, with optional noise and zero-noise
//! extrapolation.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{add, noisy, sweep, version, zne};

/// Draper - a QFT adder laboratory with noisy simulation and error mitigation
#[derive(Parser)]
#[command(name = "draper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add two numbers on the noiseless simulator
    Add {
        /// First addend
        a: u64,

        /// Second addend
        b: u64,

        /// Register width in bits (result is mod 2^bits)
        #[arg(short = 'n', long, default_value = "3")]
        bits: u32,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u32,

        /// RNG seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Add two numbers under a noise model
    Noisy {
        /// First addend
        a: u64,

        /// Second addend
        b: u64,

        /// Register width in bits (result is mod 2^bits)
        #[arg(short = 'n', long, default_value = "3")]
        bits: u32,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u32,

        /// Depolarizing error probability per gate
        #[arg(short, long, default_value = "0.001")]
        error_rate: f64,

        /// YAML noise profile (overrides --error-rate)
        #[arg(long)]
        noise_profile: Option<String>,

        /// Readout error probability per measured bit
        #[arg(long)]
        readout_error: Option<f64>,

        /// RNG seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Zero-noise extrapolation of the adder success probability
    Zne {
        /// First addend
        a: u64,

        /// Second addend
        b: u64,

        /// Register width in bits (result is mod 2^bits)
        #[arg(short = 'n', long, default_value = "3")]
        bits: u32,

        /// Number of shots per scale factor
        #[arg(short, long, default_value = "4096")]
        shots: u32,

        /// Depolarizing error probability per gate
        #[arg(short, long, default_value = "0.005")]
        error_rate: f64,

        /// Noise scale factors (comma-separated, each >= 1)
        #[arg(long, value_delimiter = ',', default_value = "1.0,2.0,3.0")]
        scale_factors: Vec<f64>,

        /// Extrapolation method (richardson, linear, polynomial)
        #[arg(short, long, default_value = "richardson")]
        method: String,

        /// Polynomial degree (only with --method polynomial)
        #[arg(long, default_value = "2")]
        degree: usize,

        /// Folding strategy (global, gate)
        #[arg(long, default_value = "global")]
        scaling: String,

        /// Write the full report as JSON to this file (stdout if "-")
        #[arg(long)]
        export: Option<String>,

        /// RNG seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Exhaustively verify the adder over all input pairs
    Sweep {
        /// Register width in bits
        #[arg(short = 'n', long, default_value = "3")]
        bits: u32,

        /// Number of shots per input pair
        #[arg(short, long, default_value = "64")]
        shots: u32,

        /// Optional depolarizing error probability per gate
        #[arg(short, long)]
        error_rate: Option<f64>,

        /// RNG seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Add {
            a,
            b,
            bits,
            shots,
            seed,
        } => add::execute(bits, a, b, shots, seed).await,

        Commands::Noisy {
            a,
            b,
            bits,
            shots,
            error_rate,
            noise_profile,
            readout_error,
            seed,
        } => {
            noisy::execute(
                bits,
                a,
                b,
                shots,
                error_rate,
                noise_profile.as_deref(),
                readout_error,
                seed,
            )
            .await
        }

        Commands::Zne {
            a,
            b,
            bits,
            shots,
            error_rate,
            scale_factors,
            method,
            degree,
            scaling,
            export,
            seed,
        } => {
            zne::execute(
                bits,
                a,
                b,
                shots,
                error_rate,
                &scale_factors,
                &method,
                degree,
                &scaling,
                export.as_deref(),
                seed,
            )
            .await
        }

        Commands::Sweep {
            bits,
            shots,
            error_rate,
            seed,
        } => sweep::execute(bits, shots, error_rate, seed).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
