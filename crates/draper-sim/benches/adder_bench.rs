//! Benchmarks for adder simulation.
//!
//! Run with: cargo bench -p draper-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use draper_ir::{Circuit, Instruction};
use draper_sim::Statevector;

fn gate_instructions(circuit: &Circuit) -> Vec<Instruction> {
    circuit.instructions().to_vec()
}

/// Benchmark one noiseless statevector pass over the adder circuit.
fn bench_adder_statevector(c: &mut Criterion) {
    let mut group = c.benchmark_group("adder_statevector");

    for bits in &[2u32, 3, 4, 5] {
        let circuit = Circuit::draper_adder(*bits, 1, 2).unwrap();
        let instructions = gate_instructions(&circuit);
        let num_qubits = circuit.num_qubits();

        group.bench_with_input(
            BenchmarkId::new("single_shot", bits),
            &instructions,
            |b, instructions| {
                b.iter(|| {
                    let mut sv = Statevector::new(num_qubits);
                    for inst in instructions {
                        sv.apply(inst);
                    }
                    black_box(sv.probability(0))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark building the adder circuit itself.
fn bench_adder_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("adder_construction");

    for bits in &[3u32, 8, 16] {
        group.bench_with_input(BenchmarkId::new("build", bits), bits, |b, &n| {
            b.iter(|| black_box(Circuit::draper_adder(n, 1, 2).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_adder_statevector, bench_adder_construction);

criterion_main!(benches);
