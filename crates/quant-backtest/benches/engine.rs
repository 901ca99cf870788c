//! Benchmarks for the simulation engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quant_backtest::{metrics, BacktestConfig, BacktestEngine};
use quant_core::types::{Bar, BarSeries};
use quant_strategies::{MACrossoverConfig, MACrossoverStrategy};
use quant_core::traits::SignalProvider;

fn generate_bars(size: usize) -> BarSeries {
    let bars = (0..size)
        .map(|i| {
            let price = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64 * 86_400_000, price, price + 1.0, price - 1.0, price, 1_000_000.0)
        })
        .collect();
    BarSeries::new("BENCH", bars).unwrap()
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let engine = BacktestEngine::new(BacktestConfig::new(100_000.0, 0.001)).unwrap();
    let strategy = MACrossoverStrategy::new(MACrossoverConfig::default()).unwrap();

    for size in [1000, 10000, 100000].iter() {
        let bars = generate_bars(*size);
        let signals = strategy.generate_signals(&bars).unwrap();

        group.bench_with_input(BenchmarkId::new("run", size), &bars, |b, bars| {
            b.iter(|| engine.run(black_box(bars), black_box(&signals)))
        });
    }

    group.finish();
}

fn benchmark_metrics(c: &mut Criterion) {
    let curve: Vec<f64> = (0..10000)
        .map(|i| 100_000.0 + (i as f64 * 0.05).sin() * 5_000.0)
        .collect();

    c.bench_function("metrics_10000", |b| b.iter(|| metrics::compute(black_box(&curve))));
}

criterion_group!(benches, benchmark_engine, benchmark_metrics);
criterion_main!(benches);
