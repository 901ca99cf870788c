//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quant_core::traits::Indicator;
use quant_indicators::{pct_change, Ema, Rsi, Sma, StdDev};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);
        let sma = Sma::new(20).unwrap();
        let ema = Ema::new(20).unwrap();

        group.bench_with_input(BenchmarkId::new("sma", size), &data, |b, data| {
            b.iter(|| sma.calculate(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            b.iter(|| ema.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for size in [1000, 10000].iter() {
        let data = generate_test_data(*size);
        let rsi = Rsi::new(14).unwrap();

        group.bench_with_input(BenchmarkId::new("rolling_mean", size), &data, |b, data| {
            b.iter(|| rsi.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_volatility(c: &mut Criterion) {
    let data = generate_test_data(10000);
    let std = StdDev::new(20).unwrap();

    c.bench_function("returns_stddev_10000", |b| {
        b.iter(|| std.calculate_sparse(&pct_change(black_box(&data))))
    });
}

criterion_group!(
    benches,
    benchmark_moving_averages,
    benchmark_rsi,
    benchmark_volatility
);
criterion_main!(benches);
