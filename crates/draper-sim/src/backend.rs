//! Backend trait for circuit execution.
//!
//! The [`Backend`] trait defines the job lifecycle:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! `capabilities()` is synchronous and infallible — a backend that cannot
//! report capabilities without I/O is not correctly initialized. All other
//! lifecycle methods are async so a remote backend could implement the same
//! trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use draper_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Static capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Backend name.
    pub name: String,
    /// Maximum number of qubits.
    pub num_qubits: u32,
    /// Maximum shots per job.
    pub max_shots: u32,
    /// Whether this backend is a simulator.
    pub is_simulator: bool,
}

impl Capabilities {
    /// Capabilities for a local statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".to_string(),
            num_qubits,
            max_shots: 1_000_000,
            is_simulator: true,
        }
    }
}

/// Trait for execution backends.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible; implementations
///   cache capabilities at construction time.
/// - `validate()` MUST check the circuit against backend constraints
///   before submission.
/// - `submit()` MUST return a `JobId` whose job enters the lifecycle at
///   `Queued`; a backend that executes synchronously may have already
///   driven the job to a terminal status by the time `submit()` returns.
/// - `result()` MUST only be called when status is `Completed`.
/// - `wait()` has a default implementation (500ms poll, 5-minute timeout).
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit against backend constraints.
    async fn validate(&self, circuit: &Circuit) -> SimResult<()>;

    /// Submit a circuit for execution.
    ///
    /// Returns a job ID that can be used to check status and retrieve
    /// results.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> SimResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> SimResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> SimResult<ExecutionResult>;

    /// Cancel a job that has not completed.
    async fn cancel(&self, job_id: &JobId) -> SimResult<()>;

    /// Wait for a job to complete and return its result.
    ///
    /// Default implementation polls every 500ms for up to 5 minutes.
    async fn wait(&self, job_id: &JobId) -> SimResult<ExecutionResult> {
        use tokio::time::sleep;

        let poll_interval = Duration::from_millis(500);
        let max_polls = 600; // 5 minutes max

        for _ in 0..max_polls {
            let status = self.status(job_id).await?;

            match status {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(SimError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(SimError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    sleep(poll_interval).await;
                }
            }
        }

        Err(SimError::Timeout(job_id.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20);
        assert_eq!(caps.name, "simulator");
        assert_eq!(caps.num_qubits, 20);
        assert!(caps.is_simulator);
    }
}
