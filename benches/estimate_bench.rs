//! Benchmarks for the estimation pipeline.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use n2s_estimator::core::{EstimationInputs, SizeBand};
use n2s_estimator::{estimate, Configuration, Estimator};
use std::hint::black_box;

fn with_addons(size: SizeBand) -> EstimationInputs {
    let mut inputs = EstimationInputs::default();
    inputs.size_band = size;
    inputs.include_integrations = true;
    inputs.include_reports = true;
    inputs.include_degree_works = true;
    inputs.degree_works.majors = 40;
    inputs
}

fn bench_base_only(c: &mut Criterion) {
    let config = Configuration::baseline();
    let inputs = EstimationInputs::default();
    c.bench_function("estimate_base_only", |b| {
        b.iter(|| estimate(black_box(&inputs), black_box(&config)))
    });
}

fn bench_all_packages(c: &mut Criterion) {
    let estimator = match Estimator::baseline() {
        Ok(estimator) => estimator,
        Err(e) => panic!("baseline configuration is invalid: {e}"),
    };
    let mut group = c.benchmark_group("estimate_all_packages");
    for size in SizeBand::ALL {
        let inputs = with_addons(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &inputs, |b, inputs| {
            b.iter(|| estimator.estimate(black_box(inputs)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_base_only, bench_all_packages);
criterion_main!(benches);
