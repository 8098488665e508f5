//! Benchmarks for flowseries statistics
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nalgebra::DMatrix;

use flowseries::cardinality::HyperLogLog;
use flowseries::models::{KMeans, LinReg};
use flowseries::quantiles::{OrderStats, QuantileMM, QuantileMSPI, QuantileSGD};
use flowseries::sampling::ReservoirSample;
use flowseries::statistics::{CovMatrix, Extrema, Mean, Moments, Variance};
use flowseries::weights::{EqualWeight, ExponentialWeight, LearningRate};
use flowseries::{MergePolicy, Series, Statistic};

// ============================================================================
// Series ingestion
// ============================================================================

fn bench_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("series");
    group.throughput(Throughput::Elements(1));

    group.bench_function("update_summary", |b| {
        let stats = (Mean::new(), Variance::new(), Moments::new(), Extrema::new());
        let mut s = Series::new(stats, EqualWeight::new()).unwrap();
        let mut i = 0u64;
        b.iter(|| {
            s.update(black_box(i as f64)).unwrap();
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("merge_append", |b| {
        let template = Series::new((Mean::new(), Variance::new()), EqualWeight::new()).unwrap();
        let mut s1 = template.clone();
        let mut s2 = template.clone();
        s1.fit((0..10_000).map(|i| i as f64)).unwrap();
        s2.fit((10_000..20_000).map(|i| i as f64)).unwrap();
        b.iter(|| {
            let mut s = s1.clone();
            s.merge(black_box(&s2), MergePolicy::Append).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Quantile Benchmarks
// ============================================================================

fn bench_quantiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantiles");
    group.throughput(Throughput::Elements(1));

    let tau = [0.1, 0.25, 0.5, 0.75, 0.9];

    group.bench_function("mm", |b| {
        let mut s = Series::new((QuantileMM::new(&tau).unwrap(),), LearningRate::default()).unwrap();
        let mut i = 0u64;
        b.iter(|| {
            s.update((i % 1000) as f64).unwrap();
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("mspi", |b| {
        let mut s =
            Series::new((QuantileMSPI::new(&tau).unwrap(),), LearningRate::default()).unwrap();
        let mut i = 0u64;
        b.iter(|| {
            s.update((i % 1000) as f64).unwrap();
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("sgd", |b| {
        let mut s = Series::new((QuantileSGD::new(&tau).unwrap(),), LearningRate::default()).unwrap();
        let mut i = 0u64;
        b.iter(|| {
            s.update((i % 1000) as f64).unwrap();
            i = i.wrapping_add(1);
        });
    });

    for block in [10, 100] {
        group.bench_function(format!("order_stats_b{}", block), |b| {
            let mut o = OrderStats::new(block).unwrap();
            let mut i = 0u64;
            b.iter(|| {
                o.update((i % 1000) as f64, 1.0);
                i = i.wrapping_add(1);
            });
        });
    }

    group.finish();
}

// ============================================================================
// HyperLogLog Benchmarks
// ============================================================================

fn bench_hll(c: &mut Criterion) {
    let mut group = c.benchmark_group("hyperloglog");
    group.throughput(Throughput::Elements(1));

    for bits in [10, 12, 14, 16] {
        group.bench_function(format!("update_b{}", bits), |b| {
            let mut hll = HyperLogLog::new(bits).unwrap();
            let mut i = 0u64;
            b.iter(|| {
                hll.update(i as f64, 1.0);
                i = i.wrapping_add(1);
            });
        });
    }

    group.bench_function("value", |b| {
        let mut hll = HyperLogLog::new(14).unwrap();
        for i in 0..100_000u64 {
            hll.update(i as f64, 1.0);
        }
        b.iter(|| black_box(hll.value()));
    });

    group.bench_function("merge", |b| {
        let mut hll1 = HyperLogLog::new(14).unwrap();
        let mut hll2 = HyperLogLog::new(14).unwrap();
        for i in 0..10_000u64 {
            hll1.update(i as f64, 1.0);
            hll2.update((i + 10_000) as f64, 1.0);
        }
        b.iter(|| {
            let mut h = hll1.clone();
            h.merge(black_box(&hll2), 0.5).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Reservoir Benchmarks
// ============================================================================

fn bench_reservoir(c: &mut Criterion) {
    let mut group = c.benchmark_group("reservoir");
    group.throughput(Throughput::Elements(1));

    for capacity in [100, 1000, 10000] {
        group.bench_function(format!("update_k{}", capacity), |b| {
            let mut sampler = ReservoirSample::new(capacity).unwrap();
            let mut i = 0u64;
            b.iter(|| {
                sampler.update(i as f64, 1.0);
                i = i.wrapping_add(1);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Multivariate Benchmarks
// ============================================================================

fn bench_multivariate(c: &mut Criterion) {
    let mut group = c.benchmark_group("multivariate");

    for p in [4, 16] {
        let x = DMatrix::from_fn(1000, p, |i, j| ((i * 31 + j * 17) % 97) as f64);
        let y: Vec<f64> = (0..1000).map(|i| x.row(i).sum() + 1.0).collect();
        group.throughput(Throughput::Elements(1000));

        group.bench_function(format!("covmatrix_p{}", p), |b| {
            b.iter(|| {
                let mut s = Series::new((CovMatrix::new(p).unwrap(),), EqualWeight::new()).unwrap();
                s.fit_rows(black_box(&x)).unwrap();
                black_box(s.value())
            });
        });

        group.bench_function(format!("linreg_fit_p{}", p), |b| {
            b.iter(|| {
                let weight = ExponentialWeight::new(0.01).unwrap();
                let mut s = Series::new((LinReg::new(p).unwrap(),), weight).unwrap();
                s.fit_xy(black_box(&x), &y).unwrap();
                black_box(s.value())
            });
        });

        group.bench_function(format!("kmeans_k5_p{}", p), |b| {
            b.iter(|| {
                let mut s = Series::new((KMeans::new(p, 5).unwrap(),), EqualWeight::new()).unwrap();
                s.fit_rows(black_box(&x)).unwrap();
                black_box(s.value())
            });
        });
    }

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(
    benches,
    bench_series,
    bench_quantiles,
    bench_hll,
    bench_reservoir,
    bench_multivariate,
);

criterion_main!(benches);
