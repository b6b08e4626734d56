//! Local simulator backend.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use draper_ir::{Circuit, InstructionKind};

use crate::backend::{Backend, Capabilities};
use crate::error::{SimError, SimResult};
use crate::job::{Job, JobId, JobStatus};
use crate::noise::NoiseSpec;
use crate::result::{Counts, ExecutionResult};
use crate::statevector::Statevector;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector simulator backend.
///
/// Executes circuits shot by shot. With a [`NoiseSpec`] attached, each shot
/// samples one error trajectory: after every gate, the matching channel is
/// sampled once per touched qubit and any drawn Pauli error is applied to
/// the state. Readout error flips each measured bit independently.
///
/// Supports circuits up to ~20 qubits (limited by memory).
pub struct SimulatorBackend {
    capabilities: Capabilities,
    /// Active jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    noise: NoiseSpec,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a noiseless simulator with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(20)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            noise: NoiseSpec::default(),
            seed: None,
        }
    }

    /// Attach a noise specification.
    pub fn with_noise(mut self, noise: NoiseSpec) -> SimResult<Self> {
        noise.validate()?;
        self.noise = noise;
        Ok(self)
    }

    /// Fix the RNG seed for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();

        let num_qubits = circuit.num_qubits();
        let num_clbits = circuit.num_clbits();
        debug!("Starting simulation: {} qubits, {} shots", num_qubits, shots);

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Measurement wiring: qubit index → clbit index, in program order.
        let measure_map: Vec<(usize, usize)> = circuit
            .instructions()
            .iter()
            .filter(|inst| inst.is_measure())
            .map(|inst| (inst.qubits[0].0 as usize, inst.clbits[0].0 as usize))
            .collect();

        let mut counts = Counts::new();

        for shot in 0..shots {
            let mut sv = Statevector::new(num_qubits);

            for inst in circuit.instructions() {
                sv.apply(inst);

                if let InstructionKind::Gate(_) = inst.kind {
                    if let Some(channel) = self.noise.channel_for_arity(inst.qubits.len()) {
                        for qubit in &inst.qubits {
                            if let Some(error) = channel.sample(&mut rng) {
                                sv.apply_pauli(qubit.0 as usize, error);
                            }
                        }
                    }
                }
            }

            let outcome = sv.sample(&mut rng);

            // Route measured qubit values to classical bits, then apply
            // readout error per bit.
            let mut bits = vec![false; num_clbits];
            for &(qubit, clbit) in &measure_map {
                let mut value = (outcome >> qubit) & 1 == 1;
                if self.noise.readout_error > 0.0 && rng.r#gen::<f64>() < self.noise.readout_error {
                    value = !value;
                }
                bits[clbit] = value;
            }

            // MSB-first: clbit n−1 is the leftmost character.
            let bitstring: String = bits
                .iter()
                .rev()
                .map(|&b| if b { '1' } else { '0' })
                .collect();
            counts.insert(bitstring, 1);

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, circuit: &Circuit) -> SimResult<()> {
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(SimError::CircuitTooLarge(format!(
                "circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> SimResult<JobId> {
        self.validate(circuit).await?;
        if shots == 0 {
            return Err(SimError::InvalidShots("shots must be positive".into()));
        }
        if shots > self.capabilities.max_shots {
            return Err(SimError::InvalidShots(format!(
                "requested {} shots but the limit is {}",
                shots, self.capabilities.max_shots
            )));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots);

        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        }

        debug!("Submitted job: {}", job_id);

        // Local execution is synchronous; the job is complete by the time
        // submit() returns.
        let result = self.run_simulation(circuit, shots);

        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                sim_job.result = Some(result);
                sim_job.job = sim_job.job.clone().with_status(JobStatus::Completed);
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> SimResult<JobStatus> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| SimError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> SimResult<ExecutionResult> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .and_then(|j| j.result.clone())
            .ok_or_else(|| SimError::JobNotFound(job_id.0.clone()))
    }

    async fn cancel(&self, job_id: &JobId) -> SimResult<()> {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            if !sim_job.job.status.is_terminal() {
                sim_job.job = sim_job.job.clone().with_status(JobStatus::Cancelled);
            }
            Ok(())
        } else {
            Err(SimError::JobNotFound(job_id.0.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new();

        let circuit = Circuit::bell().unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();

        let status = backend.status(&job_id).await.unwrap();
        assert!(status.is_success());

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);

        // Bell state should produce only 00 and 11
        let counts = &result.counts;
        assert!(counts.get("00") + counts.get("11") == 1000);
        assert!(counts.get("01") + counts.get("10") == 0);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(SimError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_simulator_rejects_zero_shots() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::bell().unwrap();
        let result = backend.submit(&circuit, 0).await;

        assert!(matches!(result, Err(SimError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let circuit = Circuit::bell().unwrap();

        let a = SimulatorBackend::new().with_seed(99);
        let id_a = a.submit(&circuit, 200).await.unwrap();
        let result_a = a.result(&id_a).await.unwrap();

        let b = SimulatorBackend::new().with_seed(99);
        let id_b = b.submit(&circuit, 200).await.unwrap();
        let result_b = b.result(&id_b).await.unwrap();

        assert_eq!(result_a.counts, result_b.counts);
    }

    #[tokio::test]
    async fn test_wait_returns_completed_result() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::bell().unwrap();
        let job_id = backend.submit(&circuit, 100).await.unwrap();

        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.shots, 100);
    }

    #[tokio::test]
    async fn test_certain_readout_error_flips_everything() {
        let noise = NoiseSpec::default().with_readout_error(1.0);
        let backend = SimulatorBackend::new().with_noise(noise).unwrap();

        // |00⟩ measured through certain readout error reads "11"
        let mut circuit = Circuit::new("readout");
        circuit.add_qreg("q", 2);
        circuit.add_creg("c", 2);
        circuit.measure_all().unwrap();

        let job_id = backend.submit(&circuit, 100).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.get("11"), 100);
    }
}
