#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use beredskap_simulator::{Scenario, Simulator};

/// Benchmark scenario throughput by running a long seeded random scenario.
fn benchmark_scenario_throughput(c: &mut Criterion) {
    let steps = 10_000;
    let seed = 42;
    let scenario = Scenario::random(seed, steps);

    c.bench_function("scenario_throughput", |b| {
        b.iter(|| {
            let simulator = Simulator::new(&scenario);
            black_box(simulator.run(&scenario));
        })
    });
}

criterion_group!(benches, benchmark_scenario_throughput);
criterion_main!(benches);
