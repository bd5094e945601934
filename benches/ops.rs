//! Array kernel benchmarks.
//!
//! Compares, for each kernel and array size:
//!
//! - a plain scalar loop (baseline)
//! - the vectorised [`ArrayOps`] kernel
//! - its rayon `par_*` variant, above the parallel threshold
//! - `ndarray` as an external reference where it has the operation
//!
//! Run with `RUSTFLAGS="-C target-cpu=native" cargo bench --bench ops` to
//! measure the widest tier of the build machine.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdtype::cpu::Tier;
use simdtype::ops::ArrayOps;
use simdtype::simd::{float16, float4, float8, SimdVec};
use simdtype::PARALLEL_SIMD_THRESHOLD;

// ================================================================================================
// BENCHMARK CONFIGURATION
// ================================================================================================

/// Array lengths from L1-resident to main-memory bound (f32 = 4 bytes).
const VECTOR_SIZES: &[usize] = &[
    1_024,     // 4 KiB - L1 cache
    16_384,    // 64 KiB - L1→L2 transition
    262_144,   // 1 MiB - L2 cache, last sequential size
    1_048_576, // 4 MiB - L3 cache
    8_388_608, // 32 MiB - main memory
];

fn generate_test_data(len: usize) -> (Vec<f32>, Vec<f32>) {
    let mut rng = StdRng::seed_from_u64(42);
    let a: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
    let b: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
    (a, b)
}

// ================================================================================================
// SCALAR BASELINES
// ================================================================================================

fn scalar_dot(x: &[f32], y: &[f32]) -> f32 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

fn scalar_maxabs(x: &[f32]) -> f32 {
    x.iter().fold(0.0, |m, v| m.max(v.abs()))
}

fn scalar_axpy(a: f32, x: &[f32], b: f32, y: &mut [f32]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi = a * xi + b * *yi;
    }
}

/// Dot product written directly against one width, to compare widths.
fn width_dot<V: SimdVec<Scalar = f32>>(x: &[f32], y: &[f32]) -> f32 {
    let mut acc = V::zero();
    for (xc, yc) in x.chunks_exact(V::LANES).zip(y.chunks_exact(V::LANES)) {
        acc = V::from_slice(xc).fmuladd(V::from_slice(yc), acc);
    }
    acc.sum()
}

// ================================================================================================
// BENCHMARK IMPLEMENTATIONS
// ================================================================================================

fn benchmark_dot(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("dot_{}", format_size(size)));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>() * 2) as u64));

        let (a_vec, b_vec) = generate_test_data(size);
        let (a, b) = (a_vec.as_slice(), b_vec.as_slice());

        group.bench_with_input(BenchmarkId::new("scalar", size), &(a, b), |bench, (x, y)| {
            bench.iter(|| black_box(scalar_dot(black_box(x), black_box(y))))
        });
        group.bench_with_input(BenchmarkId::new("simd", size), &(a, b), |bench, (x, y)| {
            bench.iter(|| black_box(f32::dot(black_box(x), black_box(y))))
        });
        if size > PARALLEL_SIMD_THRESHOLD {
            group.bench_with_input(
                BenchmarkId::new("parallel_simd", size),
                &(a, b),
                |bench, (x, y)| bench.iter(|| black_box(f32::par_dot(black_box(x), black_box(y)))),
            );
        }

        let a_nd = Array1::from_vec(a_vec.clone());
        let b_nd = Array1::from_vec(b_vec.clone());
        group.bench_with_input(
            BenchmarkId::new("ndarray", size),
            &(&a_nd, &b_nd),
            |bench, (x, y)| bench.iter(|| black_box(x.dot(*y))),
        );

        group.finish();
    }
}

fn benchmark_widths(c: &mut Criterion) {
    let size = 16_384;
    let (a_vec, b_vec) = generate_test_data(size);
    let mut group = c.benchmark_group(format!("dot_width_{}", Tier::compiled()));
    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("float4", |bench| {
        bench.iter(|| black_box(width_dot::<float4>(black_box(&a_vec), black_box(&b_vec))))
    });
    group.bench_function("float8", |bench| {
        bench.iter(|| black_box(width_dot::<float8>(black_box(&a_vec), black_box(&b_vec))))
    });
    group.bench_function("float16", |bench| {
        bench.iter(|| black_box(width_dot::<float16>(black_box(&a_vec), black_box(&b_vec))))
    });

    group.finish();
}

fn benchmark_maxabs(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("maxabs_{}", format_size(size)));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>()) as u64));

        let (a_vec, _) = generate_test_data(size);

        group.bench_with_input(BenchmarkId::new("scalar", size), &a_vec, |bench, x| {
            bench.iter(|| black_box(scalar_maxabs(black_box(x))))
        });
        group.bench_with_input(BenchmarkId::new("simd", size), &a_vec, |bench, x| {
            bench.iter(|| black_box(f32::maxabs(black_box(x))))
        });

        group.finish();
    }
}

fn benchmark_axpy(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("axpy_{}", format_size(size)));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>() * 3) as u64));

        let (x, y0) = generate_test_data(size);
        let mut y = y0.clone();

        group.bench_function(BenchmarkId::new("scalar", size), |bench| {
            bench.iter(|| scalar_axpy(black_box(0.5), black_box(&x), black_box(0.5), &mut y))
        });
        group.bench_function(BenchmarkId::new("simd", size), |bench| {
            bench.iter(|| f32::axpy(black_box(0.5), black_box(&x), black_box(0.5), &mut y))
        });
        if size > PARALLEL_SIMD_THRESHOLD {
            group.bench_function(BenchmarkId::new("parallel_simd", size), |bench| {
                bench.iter(|| f32::par_axpy(black_box(0.5), black_box(&x), black_box(0.5), &mut y))
            });
        }

        group.finish();
    }
}

// ================================================================================================
// UTILITY FUNCTIONS
// ================================================================================================

fn format_size(elements: usize) -> String {
    let bytes = elements * std::mem::size_of::<f32>();

    if bytes >= 1_048_576 {
        format!("{:.1}_MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}_KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes}_B")
    }
}

criterion_group!(
    benches,
    benchmark_dot,
    benchmark_widths,
    benchmark_maxabs,
    benchmark_axpy
);
criterion_main!(benches);
