//! Local noisy quantum circuit simulator.
//!
//! This crate executes [`draper_ir::Circuit`]s on a statevector engine,
//! shot by shot, optionally under a Pauli noise model sampled per
//! trajectory:
//! - The [`Backend`] trait covers the job lifecycle (submit, status,
//!   result, cancel, wait).
//! - [`SimulatorBackend`] is the local implementation, with optional
//!   [`NoiseSpec`] and a fixable RNG seed.
//! - [`Counts`] and [`ExecutionResult`] hold measurement outcomes;
//!   [`Observable`] turns them into expectation values.
//!
//! # Example: Adding 3 + 5 on a noisy simulator
//!
//! ```ignore
//! use draper_ir::Circuit;
//! use draper_sim::{Backend, NoiseSpec, SimulatorBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::draper_adder(3, 3, 5)?;
//!
//!     let backend = SimulatorBackend::new()
//!         .with_noise(NoiseSpec::depolarizing(0.001))?;
//!
//!     let job_id = backend.submit(&circuit, 1024).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     // (3 + 5) mod 8 = 0, so "000" should dominate
//!     if let Some((bitstring, count)) = result.counts.most_frequent() {
//!         println!("Most frequent: {} ({} times)", bitstring, count);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod job;
pub mod noise;
pub mod observable;
pub mod result;
pub mod simulator;
pub mod statevector;

pub use backend::{Backend, Capabilities};
pub use error::{SimError, SimResult};
pub use job::{Job, JobId, JobStatus};
pub use noise::{NoiseModel, NoiseSpec, PauliError};
pub use observable::Observable;
pub use result::{Counts, ExecutionResult};
pub use simulator::SimulatorBackend;
pub use statevector::Statevector;
