//! Error types for the simulator crate.

use thiserror::Error;

/// Errors that can occur in simulator operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Circuit exceeds simulator capabilities.
    #[error("Circuit exceeds simulator capabilities: {0}")]
    CircuitTooLarge(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Invalid noise specification.
    #[error("Invalid noise specification: {0}")]
    InvalidNoise(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
