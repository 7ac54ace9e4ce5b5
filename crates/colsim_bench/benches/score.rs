//! Replay and scoring benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use colsim_core::{
    analyze, evaluate_dataset, replay, Config, RecordProcessor, StrategyFactory, StrategyRegistry,
};
use colsim_model::{DatasetLayout, ShapeId};
use colsim_testkit::dataset_with_rows;

/// Counts rows without doing further work, to isolate replay cost.
#[derive(Default)]
struct CountRows(u64);

impl RecordProcessor for CountRows {
    fn process_record(&mut self, _shape: ShapeId) {
        self.0 += 1;
    }
}

/// Benchmark the sequential replay loop, with and without sampling.
fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");

    for rows in [1_000usize, 10_000, 100_000].iter() {
        let snapshot = dataset_with_rows(8, *rows);
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("full", rows), &snapshot, |b, snapshot| {
            b.iter(|| {
                let mut counter = CountRows::default();
                replay(black_box(snapshot), &mut counter, 1.0, 0);
                black_box(counter.0);
            });
        });

        group.bench_with_input(
            BenchmarkId::new("sampled", rows),
            &snapshot,
            |b, snapshot| {
                b.iter(|| {
                    let mut counter = CountRows::default();
                    replay(black_box(snapshot), &mut counter, 0.1, 0);
                    black_box(counter.0);
                });
            },
        );
    }

    group.finish();
}

/// Runs a strategy to completion and returns the layout it proposed.
fn proposed_layout(
    factory: &dyn StrategyFactory,
    snapshot: &DatasetLayout,
) -> (Vec<Vec<ShapeId>>, Vec<colsim_model::Field>) {
    let fields = match factory.field_strategy(&snapshot.shapes, &snapshot.fields) {
        Some(mut sim) => {
            replay(snapshot, &mut *sim, 1.0, 0);
            sim.into_fields()
        }
        None => snapshot.fields.clone(),
    };
    let mut sim = factory.record_strategy(&snapshot.shapes, &fields);
    replay(snapshot, &mut *sim, 1.0, 0);
    sim.flush();
    (sim.into_segments(), fields)
}

/// Benchmark scoring alone, on a pre-built proposed layout.
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    let registry = StrategyRegistry::with_builtins();
    let factory = registry.get("clustered").unwrap();

    for rows in [1_000usize, 10_000, 100_000].iter() {
        let snapshot = dataset_with_rows(8, *rows);
        let (segments, fields) = proposed_layout(factory, &snapshot);
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(rows),
            &(segments, fields, snapshot),
            |b, (segments, fields, snapshot)| {
                b.iter(|| {
                    let analysis =
                        analyze(black_box(segments), black_box(fields), black_box(snapshot))
                            .unwrap();
                    black_box(analysis.used_bytes);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the full training, replay, and scoring pipeline for each
/// built-in strategy.
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_dataset");
    group.sample_size(30);

    let snapshot = dataset_with_rows(8, 50_000);
    let config = Config::default();
    let registry = StrategyRegistry::with_builtins();

    for factory in registry.iter() {
        group.throughput(Throughput::Elements(snapshot.row_count()));
        group.bench_function(BenchmarkId::from_parameter(factory.name()), |b| {
            b.iter(|| {
                let analysis = evaluate_dataset(factory, black_box(&snapshot), &config)
                    .unwrap()
                    .unwrap();
                black_box(analysis.used_bytes);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_replay, bench_analyze, bench_evaluate);
criterion_main!(benches);
