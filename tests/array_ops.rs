//! Array kernels against `ndarray` and plain iterator references.

use ndarray::Array1;
use num::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdtype::ops::ArrayOps;
use simdtype::utils::AlignedBuf;

/// Lengths around every vector width, so each kernel runs an empty, a
/// tail-only and a chunk-plus-tail case.
const LENGTHS: [usize; 10] = [0, 1, 3, 8, 15, 16, 17, 31, 64, 1001];

fn random_f64(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn random_f32(rng: &mut StdRng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect()
}

#[test]
fn test_dot_matches_ndarray() {
    let mut rng = StdRng::seed_from_u64(21);
    for len in LENGTHS {
        let x = random_f64(&mut rng, len);
        let y = random_f64(&mut rng, len);
        let expected = Array1::from(x.clone()).dot(&Array1::from(y.clone()));
        assert!(
            (f64::dot(&x, &y) - expected).abs() < 1e-12 * (len.max(1) as f64),
            "dot mismatch at length {len}"
        );

        let xf = random_f32(&mut rng, len);
        let yf = random_f32(&mut rng, len);
        let expected = Array1::from(xf.clone()).dot(&Array1::from(yf.clone()));
        assert!(
            (f32::dot(&xf, &yf) - expected).abs() < 1e-5 * (len.max(1) as f32),
            "f32 dot mismatch at length {len}"
        );
    }
}

#[test]
fn test_sqsum_equals_self_dot() {
    let mut rng = StdRng::seed_from_u64(22);
    for len in LENGTHS {
        let x = random_f32(&mut rng, len);
        assert_eq!(f32::sqsum(&x), f32::dot(&x, &x));
        let x = random_f64(&mut rng, len);
        assert_eq!(f64::sqsum(&x), f64::dot(&x, &x));
        assert!(f64::sqsum(&x) >= 0.0);
    }
}

#[test]
fn test_maxabs_minabs_match_iterators() {
    let mut rng = StdRng::seed_from_u64(23);
    for len in LENGTHS.into_iter().filter(|&len| len > 0) {
        let x = random_f64(&mut rng, len);
        let max = x.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let min = x.iter().fold(f64::MAX, |m, v| m.min(v.abs()));
        assert_eq!(f64::maxabs(&x), max);
        assert_eq!(f64::minabs(&x), min);
    }
    assert_eq!(f32::maxabs(&[]), 0.0);
    assert_eq!(f32::minabs(&[]), f32::MAX);
}

#[test]
fn test_axpy_family_matches_scalar_loops() {
    let mut rng = StdRng::seed_from_u64(24);
    for len in LENGTHS {
        let x = random_f64(&mut rng, len);
        let y0 = random_f64(&mut rng, len);
        let z0 = random_f64(&mut rng, len);

        let mut y = y0.clone();
        f64::axpy(1.5, &x, -2.0, &mut y);
        for i in 0..len {
            assert!((y[i] - (1.5 * x[i] - 2.0 * y0[i])).abs() < 1e-14);
        }

        let mut z = z0.clone();
        f64::axpy3(0.5, &x, 0.25, &y0, 2.0, &mut z);
        for i in 0..len {
            let expected = 0.5 * x[i] + 0.25 * y0[i] + 2.0 * z0[i];
            assert!((z[i] - expected).abs() < 1e-14);
        }

        let mut h = vec![0.0; len];
        f64::hprod(&x, &y0, &mut h);
        let expected: Vec<f64> = x.iter().zip(&y0).map(|(a, b)| a * b).collect();
        assert_eq!(h, expected);
    }
}

#[test]
fn test_axpy_identities() {
    let mut rng = StdRng::seed_from_u64(25);
    let x = random_f32(&mut rng, 37);
    let y0 = random_f32(&mut rng, 37);

    // a = 0, b = 1 leaves y unchanged.
    let mut y = y0.clone();
    f32::axpy(0.0, &x, 1.0, &mut y);
    assert_eq!(y, y0);

    // a = 1, b = 0 copies x.
    f32::axpy(1.0, &x, 0.0, &mut y);
    assert_eq!(y, x);
}

#[test]
fn test_fill_and_scale() {
    let mut buf = AlignedBuf::<f64>::zeroed(45);
    f64::fill(&mut buf, 2.5);
    assert!(buf.iter().all(|&v| v == 2.5));
    f64::scale(&mut buf, -2.0);
    assert!(buf.iter().all(|&v| v == -5.0));

    let mut x = vec![1.0f32; 19];
    f32::scale(&mut x, 0.0);
    assert!(x.iter().all(|&v| v == 0.0));
}

#[test]
fn test_kernels_accept_misaligned_slices() {
    let values: Vec<f32> = (0..40).map(|i| i as f32).collect();
    let data = AlignedBuf::from_slice(values.as_slice());
    let tail = &data[3..];
    let expected: f32 = tail.iter().map(|v| v * v).sum();
    assert_eq!(f32::sqsum(tail), expected);
    assert_eq!(f32::maxabs(tail), 39.0);
    assert_eq!(f32::minabs(tail), 3.0);
}

#[test]
fn test_complex_kernels() {
    let mut rng = StdRng::seed_from_u64(26);
    let x: Vec<Complex<f64>> = (0..33)
        .map(|_| Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
        .collect();

    let sq = Complex::<f64>::sqsum(&x);
    let expected: f64 = x.iter().map(|z| z.norm_sqr()).sum();
    assert!((sq.re - expected).abs() < 1e-12);
    assert_eq!(sq.im, 0.0);

    let self_dot = Complex::<f64>::dot(&x, &x);
    assert!((self_dot.re - expected).abs() < 1e-12);
    assert!(self_dot.im.abs() < 1e-12);

    let max = x.iter().fold(0.0f64, |m, z| m.max(z.norm()));
    assert_eq!(Complex::<f64>::maxabs(&x), max);

    let mut y = x.clone();
    <Complex<f64> as ArrayOps>::scale(&mut y, Complex::new(0.0, 1.0));
    for (yi, xi) in y.iter().zip(&x) {
        assert_eq!(*yi, Complex::new(-xi.im, xi.re));
    }
}

#[test]
#[should_panic(expected = "same length")]
fn test_dot_length_mismatch_panics() {
    let _ = f32::dot(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
}

#[test]
#[should_panic(expected = "same length")]
fn test_hprod_length_mismatch_panics() {
    let mut z = vec![0.0; 2];
    f64::hprod(&[1.0, 2.0], &[1.0, 2.0, 3.0], &mut z);
}
