//! Aggregation benchmarks over generated tick data.
//!
//! Run with: `cargo bench --package barmill-bench`

use barmill_bench::{TickConfig, synthetic_ticks, ticks_to_csv};
use barmill_lib::{
    BarAggregator, BarUnit, MemoryStorage, Pipeline, PipelineSpec, StorageProvider,
    TaskDescriptor, TaskRegistry,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Bucket widths giving a few thousand bars per 100k ticks.
const fn quantity(unit: BarUnit) -> f64 {
    match unit {
        BarUnit::Time => 60_000.0,
        BarUnit::Tick => 100.0,
        BarUnit::Value => 250_000.0,
        BarUnit::Volume => 100.0,
    }
}

fn aggregate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for count in [10_000, 100_000] {
        let ticks = synthetic_ticks(&TickConfig {
            count,
            ..Default::default()
        });
        group.throughput(Throughput::Elements(count as u64));

        for &unit in BarUnit::all() {
            let aggregator = BarAggregator::new(unit, quantity(unit)).unwrap();
            group.bench_with_input(BenchmarkId::new(unit.as_str(), count), &ticks, |b, ticks| {
                b.iter(|| aggregator.aggregate(ticks));
            });
        }
    }

    group.finish();
}

fn pipeline_benchmark(c: &mut Criterion) {
    let count = 100_000;
    let ticks = synthetic_ticks(&TickConfig {
        count,
        ..Default::default()
    });
    let memory = MemoryStorage::new();
    memory.insert("ticks/eth.csv", ticks_to_csv(&ticks)).unwrap();

    let registry =
        TaskRegistry::with_builtin_tasks(StorageProvider::new().with_backend(memory.clone()));
    let spec = PipelineSpec::new(
        "memory",
        vec![
            TaskDescriptor::new("read")
                .with_arg("filename", "eth.csv")
                .with_arg("bucket", "ticks"),
            TaskDescriptor::new("aggregate")
                .with_arg("unit", "time")
                .with_arg("quantity", 60_000),
            TaskDescriptor::new("write")
                .with_arg("filename", "eth_m1.csv")
                .with_arg("bucket", "bars"),
        ],
    );

    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);
    group.throughput(Throughput::Elements(count as u64));
    group.bench_function("read_aggregate_write_csv", |b| {
        b.iter(|| Pipeline::new(&registry).run(&spec).unwrap());
    });
    group.finish();
}

criterion_group!(benches, aggregate_benchmark, pipeline_benchmark);
criterion_main!(benches);
