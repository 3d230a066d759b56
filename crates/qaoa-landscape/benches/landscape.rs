use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qaoa_landscape::graph::{complete_graph, cycle_graph};
use qaoa_landscape::prelude::*;
use qaoa_landscape::simulator::QaoaState;
use qaoa_landscape::warm_start::encode;

fn bench_state_preparation(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_preparation");

    for n in [4, 8, 12, 16] {
        let graph = cycle_graph(n).unwrap();
        group.bench_with_input(BenchmarkId::new("cycle", n), &graph, |b, g| {
            b.iter(|| QaoaState::prepare(g, 0.7, 0.3).unwrap());
        });
    }
    group.finish();
}

fn bench_landscape(c: &mut Criterion) {
    let mut group = c.benchmark_group("landscape");
    group.sample_size(10);

    let graph = cycle_graph(10).unwrap();
    for samples in [8, 16, 32] {
        let spec = GridSpec::with_samples(samples);
        group.bench_with_input(BenchmarkId::new("sequential", samples), &spec, |b, &s| {
            b.iter(|| sample_grid(&graph, &StatevectorOracle, None, s).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parallel_4", samples), &spec, |b, &s| {
            b.iter(|| {
                LandscapeSampler::new(&graph, &StatevectorOracle, s)
                    .workers(4)
                    .run()
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    let spec = GridSpec::with_samples(64);
    let donor = sample_grid(&cycle_graph(6).unwrap(), &StatevectorOracle, None, spec).unwrap();
    let acceptor = sample_grid(&complete_graph(5), &StatevectorOracle, None, spec).unwrap();

    group.bench_function("transferability_coeff", |b| {
        b.iter(|| transferability_coeff(donor.values(), acceptor.values()).unwrap());
    });
    group.bench_function("average_difference", |b| {
        b.iter(|| average_difference(donor.values(), acceptor.values()).unwrap());
    });
    group.bench_function("param_transferable", |b| {
        b.iter(|| param_transferable(donor.values(), acceptor.values(), 0.8, 0.7).unwrap());
    });
    group.finish();
}

fn bench_canonical(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical");

    for n in [6, 8, 10] {
        let graph = complete_graph(n);
        group.bench_with_input(BenchmarkId::new("cluster_complete", n), &graph, |b, g| {
            b.iter(|| cluster_subgraphs(g).unwrap());
        });

        let graph = cycle_graph(n).unwrap();
        group.bench_with_input(BenchmarkId::new("dedupe_warm_starts", n), &graph, |b, g| {
            b.iter(|| {
                let mut index = WarmStartIndex::new();
                for k in 0..(1u64 << n.min(8)) {
                    index.insert_if_new(g, &encode(k, n, 2).unwrap()).unwrap();
                }
                index.len()
            });
        });
    }
    group.finish();
}

fn bench_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation");

    for n in [8, 16, 32] {
        let graph = complete_graph(n);
        group.bench_with_input(BenchmarkId::new("mixing_method", n), &graph, |b, g| {
            b.iter(|| MixingMethodSolver::default().solve(g).unwrap());
        });
    }
    for n in [10, 14, 18] {
        let graph = cycle_graph(n).unwrap();
        group.bench_with_input(BenchmarkId::new("brute_force", n), &graph, |b, g| {
            b.iter(|| brute_force_maxcut(g).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_state_preparation,
    bench_landscape,
    bench_metrics,
    bench_canonical,
    bench_relaxation
);
criterion_main!(benches);
