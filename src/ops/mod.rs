//! Vectorised kernels over contiguous 1D arrays.
//!
//! [`ArrayOps`] is the kernel catalogue for one element type. It is
//! implemented for `f32`, `f64`, `Complex<f32>` and `Complex<f64>` and is
//! called through the element type:
//!
//! ```rust
//! use simdtype::ops::ArrayOps;
//!
//! let x = [-5.0f32, 1.0, 2.0, -3.0, 4.0];
//! assert_eq!(f32::maxabs(&x), 5.0);
//! assert_eq!(f32::minabs(&x), 1.0);
//! assert_eq!(f32::sqsum(&x), 55.0);
//! ```
//!
//! # Implementation
//!
//! Real kernels run [`float16`](crate::simd::float16) (`f32`) or
//! [`double8`](crate::simd::double8) (`f64`) chunks with unaligned loads and
//! finish the last `len % LANES` elements with a scalar loop, so any slice
//! works regardless of alignment or length. Complex `sqsum` reuses the real
//! kernel on the interleaved `[re, im, re, im, ...]` view; the other complex
//! kernels are scalar loops.
//!
//! # Parallel variants
//!
//! The `par_*` methods split arrays longer than
//! [`PARALLEL_SIMD_THRESHOLD`](crate::PARALLEL_SIMD_THRESHOLD) into
//! [`PARALLEL_CHUNK_SIZE`](crate::PARALLEL_CHUNK_SIZE) chunks processed by
//! rayon. Reductions collect one partial per chunk and add the partials in
//! chunk order, so the result for a given input never depends on the number
//! of threads.
//!
//! # Panics
//!
//! Kernels taking several arrays panic when their lengths differ.

mod complex;
mod real;

use std::ops::Add;

use num::Zero;
use rayon::prelude::*;

use crate::{PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD};

/// Array kernels for one element type.
pub trait ArrayOps: Copy + Send + Sync + Zero + Add<Output = Self> + 'static {
    /// Magnitude type: `Self` for reals, the component type for complex numbers.
    type Real;

    /// `x[i] = value`.
    fn fill(x: &mut [Self], value: Self);

    /// `x[i] *= a`.
    fn scale(x: &mut [Self], a: Self);

    /// `Σ x[i] · conj(x[i])`. Zero for an empty array; for complex
    /// elements the imaginary part of the result is zero.
    fn sqsum(x: &[Self]) -> Self;

    /// Largest magnitude, or zero for an empty array.
    fn maxabs(x: &[Self]) -> Self::Real;

    /// Smallest magnitude, or the largest finite value for an empty array.
    fn minabs(x: &[Self]) -> Self::Real;

    /// `Σ conj(x[i]) · y[i]`; for reals `dot(x, x) == sqsum(x)` exactly.
    fn dot(x: &[Self], y: &[Self]) -> Self;

    /// `y ← a·x + b·y`.
    fn axpy(a: Self, x: &[Self], b: Self, y: &mut [Self]);

    /// `z ← a·x + b·y + c·z`.
    fn axpy3(a: Self, x: &[Self], b: Self, y: &[Self], c: Self, z: &mut [Self]);

    /// Hadamard product `z[i] = x[i] · y[i]`.
    fn hprod(x: &[Self], y: &[Self], z: &mut [Self]);

    /// Parallel [`sqsum`](ArrayOps::sqsum).
    fn par_sqsum(x: &[Self]) -> Self {
        if x.len() <= PARALLEL_SIMD_THRESHOLD {
            return Self::sqsum(x);
        }
        log_chunking("par_sqsum", x.len());

        let partials: Vec<Self> = x.par_chunks(PARALLEL_CHUNK_SIZE).map(Self::sqsum).collect();
        sum_in_order(partials)
    }

    /// Parallel [`dot`](ArrayOps::dot).
    fn par_dot(x: &[Self], y: &[Self]) -> Self {
        assert_eq!(x.len(), y.len(), "dot: x and y must have the same length");
        if x.len() <= PARALLEL_SIMD_THRESHOLD {
            return Self::dot(x, y);
        }
        log_chunking("par_dot", x.len());

        let partials: Vec<Self> = x
            .par_chunks(PARALLEL_CHUNK_SIZE)
            .zip(y.par_chunks(PARALLEL_CHUNK_SIZE))
            .map(|(xc, yc)| Self::dot(xc, yc))
            .collect();
        sum_in_order(partials)
    }

    /// Parallel [`axpy`](ArrayOps::axpy).
    fn par_axpy(a: Self, x: &[Self], b: Self, y: &mut [Self]) {
        assert_eq!(x.len(), y.len(), "axpy: x and y must have the same length");
        if x.len() <= PARALLEL_SIMD_THRESHOLD {
            return Self::axpy(a, x, b, y);
        }
        log_chunking("par_axpy", x.len());

        y.par_chunks_mut(PARALLEL_CHUNK_SIZE)
            .zip(x.par_chunks(PARALLEL_CHUNK_SIZE))
            .for_each(|(yc, xc)| Self::axpy(a, xc, b, yc));
    }

    /// Parallel [`scale`](ArrayOps::scale).
    fn par_scale(x: &mut [Self], a: Self) {
        if x.len() <= PARALLEL_SIMD_THRESHOLD {
            return Self::scale(x, a);
        }
        log_chunking("par_scale", x.len());

        x.par_chunks_mut(PARALLEL_CHUNK_SIZE)
            .for_each(|chunk| Self::scale(chunk, a));
    }
}

fn log_chunking(kernel: &str, len: usize) {
    log::trace!(
        "{kernel}: {len} elements in {} chunks of {PARALLEL_CHUNK_SIZE}",
        len.div_ceil(PARALLEL_CHUNK_SIZE)
    );
}

fn sum_in_order<T: Zero + Add<Output = T>>(partials: Vec<T>) -> T {
    partials.into_iter().fold(T::zero(), |acc, p| acc + p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_f64(len: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    #[test]
    fn test_par_below_threshold_is_sequential() {
        let x = random_f64(1000, 1);
        let y = random_f64(1000, 2);
        assert_eq!(f64::par_sqsum(&x), f64::sqsum(&x));
        assert_eq!(f64::par_dot(&x, &y), f64::dot(&x, &y));
    }

    #[test_log::test]
    fn test_par_sqsum_sums_chunks_in_order() {
        let len = PARALLEL_SIMD_THRESHOLD + 3 * PARALLEL_CHUNK_SIZE + 17;
        let x: Vec<f32> = random_f64(len, 3).into_iter().map(|v| v as f32).collect();
        let expected = x
            .chunks(PARALLEL_CHUNK_SIZE)
            .map(f32::sqsum)
            .fold(0.0f32, |acc, p| acc + p);
        assert_eq!(f32::par_sqsum(&x), expected);
        assert_eq!(f32::par_sqsum(&x), f32::par_sqsum(&x));

        let sequential = f32::sqsum(&x);
        assert!((f32::par_sqsum(&x) - sequential).abs() / sequential < 1e-3);
    }

    #[test]
    fn test_par_dot_matches_sequential() {
        let len = PARALLEL_SIMD_THRESHOLD * 2 + 5;
        let x = random_f64(len, 4);
        let y = random_f64(len, 5);
        let par = f64::par_dot(&x, &y);
        let seq = f64::dot(&x, &y);
        assert!((par - seq).abs() < 1e-9 * len as f64);
    }

    #[test]
    fn test_par_axpy_and_scale_match_sequential() {
        let len = PARALLEL_SIMD_THRESHOLD + PARALLEL_CHUNK_SIZE / 2 + 1;
        let x = random_f64(len, 6);
        let mut y_par = random_f64(len, 7);
        let mut y_seq = y_par.clone();

        f64::par_axpy(2.0, &x, -0.5, &mut y_par);
        f64::axpy(2.0, &x, -0.5, &mut y_seq);
        assert_eq!(y_par, y_seq);

        f64::par_scale(&mut y_par, 3.0);
        f64::scale(&mut y_seq, 3.0);
        assert_eq!(y_par, y_seq);
    }

    #[test]
    fn test_par_complex_dot() {
        let len = PARALLEL_SIMD_THRESHOLD + 1;
        let x: Vec<Complex<f64>> = random_f64(len, 8)
            .into_iter()
            .map(|re| Complex::new(re, 1.0))
            .collect();
        let par = Complex::<f64>::par_dot(&x, &x);
        let seq = Complex::<f64>::sqsum(&x);
        assert!((par.re - seq.re).abs() < 1e-8 * len as f64);
        assert!(par.im.abs() < 1e-8 * len as f64);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_par_dot_length_mismatch() {
        let _ = f64::par_dot(&[1.0, 2.0], &[1.0]);
    }
}
