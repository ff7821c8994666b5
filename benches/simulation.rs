use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use herdsim::{Epidemic, ScenarioParams};

fn bench_scenario() -> Epidemic {
    let params = ScenarioParams {
        disease_name: "bench".to_string(),
        population_size: 10_000,
        r0: 2.0,
        mortality_rate: 0.1,
        total_time_steps: 1,
        pct_vaccinated: 0.5,
        num_initial_infected: 100,
    };
    Epidemic::new(params, 42).unwrap()
}

fn advance_one_step(c: &mut Criterion) {
    c.bench_function("advance_one_step", |bencher| {
        bencher.iter_batched(
            bench_scenario,
            |mut epidemic| {
                epidemic.advance_one_step();
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, advance_one_step);
criterion_main!(benches);
