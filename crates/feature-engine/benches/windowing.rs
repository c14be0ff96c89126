//! Benchmarks for recording windowing and normalization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use feature_engine::Windower;
use gesture_data::{SampleRow, SensorTable};

fn create_table(rows: usize) -> SensorTable {
    let rows = (0..rows)
        .map(|i| {
            let t = i as f64 * 0.05;
            SampleRow::from_channels([
                t.sin() * 2.0,
                t.cos() * 2.0,
                1.0,
                t.sin() * 900.0,
                t.cos() * 450.0,
                -120.0,
            ])
        })
        .collect();
    SensorTable::new("bench", rows)
}

fn benchmark_windowing(c: &mut Criterion) {
    let windower = Windower::default();

    let small = create_table(119 * 10);
    let large = create_table(119 * 200);

    c.bench_function("window_10_recordings", |b| {
        b.iter(|| windower.features(black_box(&small)))
    });

    c.bench_function("window_200_recordings", |b| {
        b.iter(|| windower.features(black_box(&large)))
    });
}

criterion_group!(benches, benchmark_windowing);
criterion_main!(benches);
