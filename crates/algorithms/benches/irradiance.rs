//! Benchmarks for global irradiance evaluation

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sunshine_algorithms::solar::{evaluate_with, AccuracyMode, EvaluatorParams, GridSpec};
use sunshine_parallel::ProcessingMode;

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_irradiance");
    let grid = GridSpec::global().build();
    let timestamp = Utc.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();

    for mode in [AccuracyMode::Fast, AccuracyMode::HighAccuracy] {
        for (label, processing) in [
            ("sequential", ProcessingMode::Sequential),
            ("parallel", ProcessingMode::Parallel),
        ] {
            let params = EvaluatorParams { timestamp, mode, processing };
            group.bench_with_input(
                BenchmarkId::new(mode.as_str(), label),
                &params,
                |b, params| b.iter(|| evaluate_with(black_box(&grid), params).unwrap()),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
