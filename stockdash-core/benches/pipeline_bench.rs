//! Criterion benchmarks for the pipeline hot paths.
//!
//! 1. Full indicator pipeline over growing series
//! 2. Individual rolling indicators (SMA, RSI)
//! 3. Dashboard view assembly (filter + pipeline + layout)

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stockdash_core::data::synthetic_series;
use stockdash_core::indicators::{Indicator, Rsi, Sma};
use stockdash_core::{
    DashboardConfig, DashboardView, IndicatorPipeline, PipelineParams, PriceSeries,
};

fn make_series(n: usize) -> PriceSeries {
    synthetic_series("BENCH", NaiveDate::from_ymd_opt(2000, 1, 3).unwrap(), n).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = IndicatorPipeline::new(PipelineParams::default()).unwrap();
    let mut group = c.benchmark_group("pipeline");
    for n in [250, 2_500, 10_000] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, s| {
            b.iter(|| pipeline.run(black_box(s)))
        });
    }
    group.finish();
}

fn bench_indicators(c: &mut Criterion) {
    let series = make_series(2_500);
    let bars = series.bars();
    c.bench_function("sma_50", |b| {
        let sma = Sma::new(50);
        b.iter(|| sma.compute(black_box(bars)))
    });
    c.bench_function("rsi_14", |b| {
        let rsi = Rsi::new(14);
        b.iter(|| rsi.compute(black_box(bars)))
    });
}

fn bench_view(c: &mut Criterion) {
    let series = make_series(2_500);
    let config = DashboardConfig::default();
    c.bench_function("dashboard_view_2500", |b| {
        b.iter(|| DashboardView::build(black_box(&series), &config).unwrap())
    });
}

criterion_group!(benches, bench_pipeline, bench_indicators, bench_view);
criterion_main!(benches);
