//! Zero-noise extrapolation (ZNE) for expectation values.
//!
//! ZNE runs the same circuit at several deliberately amplified noise
//! levels and extrapolates the measured expectation values back to the
//! zero-noise limit. This crate provides the three moving parts:
//!
//! - [`NoiseScaling`] strategies ([`GlobalFolding`], [`GateFolding`])
//!   that amplify noise by inserting `G†G` identity pairs,
//! - the [`Executor`] trait through which any backend evaluates a
//!   circuit to an expectation value,
//! - [`Extrapolator`] fits ([`RichardsonExtrapolator`],
//!   [`LinearExtrapolator`], [`PolynomialExtrapolator`]) evaluated at
//!   scale factor zero.
//!
//! [`mitigated_expectation`] wires them together and returns a
//! [`ZneReport`] with every intermediate value, ready for serialization.
//!
//! # Example
//!
//! ```ignore
//! use draper_ir::Circuit;
//! use draper_zne::{
//!     FnExecutor, GlobalFolding, RichardsonExtrapolator, mitigated_expectation,
//! };
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let circuit = Circuit::draper_adder(3, 3, 5)?;
//! let executor = FnExecutor::new(|scaled: Circuit| async move {
//!     // run `scaled` on a noisy backend, return the success probability
//!     # Ok(0.9)
//! });
//!
//! let report = mitigated_expectation(
//!     &circuit,
//!     &executor,
//!     &GlobalFolding,
//!     &RichardsonExtrapolator,
//!     &[1.0, 2.0, 3.0],
//! )
//! .await?;
//! println!("mitigated estimate: {:.4}", report.mitigated);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod extrapolate;
pub mod scaling;
pub mod zne;

pub use error::{ZneError, ZneResult};
pub use executor::{Executor, FnExecutor};
pub use extrapolate::{
    Extrapolator, LinearExtrapolator, PolynomialExtrapolator, RichardsonExtrapolator,
};
pub use scaling::{GateFolding, GlobalFolding, NoiseScaling, ScaledCircuit};
pub use zne::{ZneReport, mitigated_expectation};
