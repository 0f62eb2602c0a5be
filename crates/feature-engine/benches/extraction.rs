//! Criterion benchmarks for tap feature extraction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use feature_engine::{extract_features, TapPosition};

fn session(taps: usize) -> (Vec<f64>, Vec<TapPosition>) {
    let intervals = (0..taps.saturating_sub(1))
        .map(|i| 180.0 + 25.0 * ((i as f64) * 0.7).sin() + i as f64 * 0.4)
        .collect();
    let positions = (0..taps)
        .map(|i| TapPosition::new(540.0 + (i % 7) as f64 * 3.0, 1200.0 - (i % 5) as f64 * 4.0))
        .collect();
    (intervals, positions)
}

fn bench_intervals_only(c: &mut Criterion) {
    let (intervals, _) = session(100);
    c.bench_function("extract_100_intervals", |b| {
        b.iter(|| extract_features(black_box(&intervals), None))
    });
}

fn bench_with_positions(c: &mut Criterion) {
    let (intervals, positions) = session(100);
    c.bench_function("extract_100_taps_with_positions", |b| {
        b.iter(|| extract_features(black_box(&intervals), Some(black_box(&positions))))
    });
}

criterion_group!(benches, bench_intervals_only, bench_with_positions);
criterion_main!(benches);
