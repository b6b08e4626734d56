//! Behavior of the simulator under gate and readout noise.

use draper_ir::Circuit;
use draper_sim::{Backend, NoiseModel, NoiseSpec, Observable, SimulatorBackend};

#[tokio::test]
async fn zero_noise_matches_noiseless_backend() {
    let circuit = Circuit::draper_adder(3, 2, 3).unwrap();

    let noiseless = SimulatorBackend::new().with_seed(5);
    let zero_noise = SimulatorBackend::new()
        .with_noise(NoiseSpec::depolarizing(0.0))
        .unwrap()
        .with_seed(5);

    let id_a = noiseless.submit(&circuit, 500).await.unwrap();
    let id_b = zero_noise.submit(&circuit, 500).await.unwrap();

    let counts_a = noiseless.result(&id_a).await.unwrap().counts;
    let counts_b = zero_noise.result(&id_b).await.unwrap().counts;

    // p = 0 samples no errors but consumes RNG draws, so compare the
    // distributions rather than the exact shot sequence.
    assert_eq!(counts_a.get("101"), 500);
    assert_eq!(counts_b.get("101"), 500);
}

#[tokio::test]
async fn depolarizing_noise_degrades_success_probability() {
    let circuit = Circuit::draper_adder(3, 2, 3).unwrap();
    let correct = Observable::Projector("101".to_string());

    let backend = SimulatorBackend::new()
        .with_noise(NoiseSpec::depolarizing(0.02))
        .unwrap()
        .with_seed(11);

    let job_id = backend.submit(&circuit, 2000).await.unwrap();
    let counts = backend.result(&job_id).await.unwrap().counts;
    let p_success = correct.expectation(&counts);

    // The adder has dozens of gates, so 2% depolarizing noise must leave a
    // visible dent. It should still win the plurality at this rate.
    assert!(p_success < 0.999, "noise had no visible effect");
    assert!(p_success > 0.25, "noise rate implausibly destructive");
    assert_eq!(counts.most_frequent().unwrap().0, "101");
}

#[tokio::test]
async fn heavy_noise_approaches_uniform() {
    let circuit = Circuit::draper_adder(2, 1, 2).unwrap();

    let backend = SimulatorBackend::new()
        .with_noise(NoiseSpec::depolarizing(0.5))
        .unwrap()
        .with_seed(23);

    let job_id = backend.submit(&circuit, 4000).await.unwrap();
    let counts = backend.result(&job_id).await.unwrap().counts;

    // Fully scrambled 2-bit output: every outcome near probability 1/4.
    for outcome in ["00", "01", "10", "11"] {
        let p = counts.probability(outcome);
        assert!((p - 0.25).abs() < 0.05, "P({outcome}) = {p}");
    }
}

#[tokio::test]
async fn readout_error_flips_measured_bits() {
    let mut circuit = Circuit::new("idle");
    circuit.add_qreg("q", 3);
    circuit.add_creg("c", 3);
    circuit.measure_all().unwrap();

    let noise = NoiseSpec::default().with_readout_error(0.1);
    let backend = SimulatorBackend::new().with_noise(noise).unwrap().with_seed(31);

    let job_id = backend.submit(&circuit, 5000).await.unwrap();
    let counts = backend.result(&job_id).await.unwrap().counts;

    // Each bit flips independently with p = 0.1, so P(all correct) ≈ 0.9³.
    let p_correct = counts.probability("000");
    assert!((p_correct - 0.729).abs() < 0.03, "P(000) = {p_correct}");
}

#[tokio::test]
async fn invalid_noise_is_rejected() {
    let result = SimulatorBackend::new().with_noise(NoiseSpec::depolarizing(1.5));
    assert!(result.is_err());
}

#[test]
fn noise_profile_yaml_round_trip() {
    let yaml = "
one_qubit:
  channel: depolarizing
  p: 0.001
two_qubit:
  channel: depolarizing
  p: 0.01
readout_error: 0.02
";
    let spec: NoiseSpec = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(spec.one_qubit, Some(NoiseModel::Depolarizing { p: 0.001 }));
    assert_eq!(spec.two_qubit, Some(NoiseModel::Depolarizing { p: 0.01 }));
    assert_eq!(spec.readout_error, 0.02);

    let back = serde_yaml_ng::to_string(&spec).unwrap();
    let reparsed: NoiseSpec = serde_yaml_ng::from_str(&back).unwrap();
    assert_eq!(reparsed, spec);
}
