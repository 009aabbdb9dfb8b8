//! Benchmarks for aggregation and identity reconciliation.
//!
//! Sized for the tens of thousands of locations a single map deployment serves.
//! Run with: `cargo bench --bench reconcile`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use map_pins::{
    Aggregator, ClusterSummary, ClusteringConfig, ClusteringPipeline, Coordinate, Point, Reconciler,
    SequentialIdGenerator, SuperCluster,
};

fn scatter(n: usize) -> Vec<Point> {
    let mut seed: u64 = 7;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|i| {
            let c = Coordinate::new(14.0 + next() * 10.0, 49.0 + next() * 6.0).unwrap();
            Point::new(format!("loc-{i}"), c)
        })
        .collect()
}

fn bench_reconcile_singles(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_singles");
    for &n in &[1_000usize, 10_000, 50_000] {
        let points = scatter(n);
        let summaries: Vec<ClusterSummary> = points
            .iter()
            .map(|p| ClusterSummary::new(p.coordinate, 1).unwrap())
            .collect();
        let reconciler = Reconciler::with_generator(SequentialIdGenerator::default());
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| reconciler.reconcile(black_box(&points), black_box(&summaries)).unwrap())
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let points = scatter(20_000);
    let aggregator = SuperCluster::default();
    let mut group = c.benchmark_group("aggregate_20k");
    for zoom in [4u8, 10, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(zoom), &zoom, |b, &zoom| {
            b.iter(|| aggregator.aggregate(black_box(&points), zoom).unwrap())
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let points = scatter(20_000);
    let pipeline = ClusteringPipeline::new(ClusteringConfig::default()).unwrap();
    c.bench_function("pipeline_20k_default_zoom", |b| {
        b.iter(|| pipeline.cluster_at_default_zoom(black_box(&points)).unwrap())
    });
}

criterion_group!(benches, bench_reconcile_singles, bench_aggregate, bench_pipeline);
criterion_main!(benches);
