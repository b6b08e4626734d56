//! Error types for noise scaling and extrapolation.

use thiserror::Error;

/// Errors that can occur in mitigation operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZneError {
    /// Scale factor below 1.
    #[error("Scale factor must be >= 1, got {0}")]
    InvalidScaleFactor(f64),

    /// No scale factors were provided.
    #[error("At least one scale factor is required")]
    NoScaleFactors,

    /// Circuit contains no gates to fold.
    #[error("Circuit '{0}' has no gates to fold")]
    NothingToFold(String),

    /// Scale factors and expectation values differ in length.
    #[error("Got {factors} scale factors but {values} expectation values")]
    LengthMismatch {
        /// Number of scale factors.
        factors: usize,
        /// Number of expectation values.
        values: usize,
    },

    /// Two scale factors coincide, so the fit is underdetermined.
    #[error("Scale factors must be distinct for extrapolation")]
    DegenerateScaleFactors,

    /// Not enough data points for the requested fit.
    #[error("Extrapolation needs at least {needed} data points, got {got}")]
    InsufficientData {
        /// Minimum number of points for the fit.
        needed: usize,
        /// Number of points provided.
        got: usize,
    },

    /// The least-squares system has no unique solution.
    #[error("Polynomial fit is singular")]
    SingularFit,

    /// The executor callback failed.
    #[error("Executor failed: {0}")]
    Executor(String),

    /// Circuit manipulation failed.
    #[error(transparent)]
    Ir(#[from] draper_ir::IrError),
}

/// Result type for mitigation operations.
pub type ZneResult<T> = Result<T, ZneError>;
