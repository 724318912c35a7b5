use caption_bandit::{Bandit, Family, GroundTruth, Priors, Simulation, SimulationConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn bench_selection(c: &mut Criterion) {
    // Ten arms with mildly informative priors, roughly a contest's shortlist.
    let n = 10usize;
    let ps: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 * 0.3).collect();
    let pf: Vec<f64> = (0..n).map(|i| 4.0 - i as f64 * 0.2).collect();

    let mut group = c.benchmark_group("select_arm");
    for family in Family::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(family),
            &family,
            |b, &family| {
                let mut bandit = Bandit::with_seed(n, &ps, &pf, family, 0).unwrap();
                b.iter(|| black_box(bandit.select_arm()))
            },
        );
    }
    group.finish();

    let truth = GroundTruth::Binary((0..n).map(|i| 0.05 + i as f64 * 0.08).collect());
    let priors = Priors {
        success: ps.clone(),
        failure: pf.clone(),
    };
    let mut group = c.benchmark_group("simulation");
    group.sample_size(20);
    for family in Family::ALL {
        group.bench_with_input(
            BenchmarkId::new("1000_trials", family),
            &family,
            |b, &family| {
                b.iter(|| {
                    let sim = Simulation::from_config(
                        truth.clone(),
                        &priors,
                        SimulationConfig {
                            family,
                            trials: 1_000,
                            seed: 0,
                        },
                    )
                    .unwrap();
                    black_box(sim.run().final_regret())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
