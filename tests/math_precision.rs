//! Precision of the vector elementary functions against the standard library.
//!
//! Widths that evaluate a function with an in-register polynomial must stay
//! within a few ULP of `f32`'s own result. Everything else applies the scalar
//! routine per lane and must match it exactly, which the same bound covers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdtype::simd::{double4, float16, float8, SimdMath, SimdVec};

const MAX_ULPS: u64 = 4;

/// Distance in units in the last place; NaN matches NaN and `-0.0` matches `0.0`.
fn ulps(a: f32, b: f32) -> u64 {
    if a.is_nan() && b.is_nan() {
        return 0;
    }
    let ordered = |x: f32| {
        let i = i64::from(x.to_bits() as i32);
        if i < 0 {
            i64::from(i32::MIN) - i
        } else {
            i
        }
    };
    ordered(a).abs_diff(ordered(b))
}

fn random_inputs(seed: u64, len: usize, lo: f32, hi: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(lo..hi)).collect()
}

/// Runs `simd` over `input` one vector at a time and checks every lane.
fn check_unary<V: SimdVec<Scalar = f32>>(
    name: &str,
    input: &[f32],
    simd: impl Fn(V) -> V,
    scalar: impl Fn(f32) -> f32,
) {
    let mut worst = 0;
    for chunk in input.chunks_exact(V::LANES) {
        let out = simd(V::from_slice(chunk)).to_vec();
        for (x, got) in chunk.iter().zip(out) {
            let expected = scalar(*x);
            let error = ulps(got, expected);
            assert!(
                error <= MAX_ULPS,
                "{name}({x}) = {got}, expected {expected} ({error} ulps)"
            );
            worst = worst.max(error);
        }
    }
    println!("{name} over {} lanes: worst error {worst} ulps", V::LANES);
}

#[test]
fn test_exp_precision_random_inputs() {
    let input = random_inputs(12345, 4096, -100.0, 88.0);
    check_unary::<float8>("exp", &input, |v| v.exp(), f32::exp);
    check_unary::<float16>("exp", &input, |v| v.exp(), f32::exp);

    let near_zero = random_inputs(7, 1024, -1.0, 1.0);
    check_unary::<float8>("exp", &near_zero, |v| v.exp(), f32::exp);
}

#[test]
fn test_asin_acos_precision_random_inputs() {
    let input = random_inputs(42, 4096, -1.0, 1.0);
    check_unary::<float8>("asin", &input, |v| v.asin(), f32::asin);
    check_unary::<float8>("acos", &input, |v| v.acos(), f32::acos);
    check_unary::<float16>("asin", &input, |v| v.asin(), f32::asin);
    check_unary::<float16>("acos", &input, |v| v.acos(), f32::acos);
}

#[test]
fn test_asin_acos_near_domain_edges() {
    let edges: Vec<f32> = (0..64)
        .flat_map(|i| {
            let d = 1.0 - i as f32 * 1e-3;
            [d, -d, 0.5 + i as f32 * 1e-4, -0.5 - i as f32 * 1e-4]
        })
        .collect();
    check_unary::<float8>("asin", &edges, |v| v.asin(), f32::asin);
    check_unary::<float8>("acos", &edges, |v| v.acos(), f32::acos);
}

#[test]
fn test_atan_precision_random_inputs() {
    let mut rng = StdRng::seed_from_u64(99);
    // magnitudes spread over many binades
    let input: Vec<f32> = (0..4096)
        .map(|_| {
            let magnitude = 10f32.powf(rng.random_range(-20.0..20.0));
            if rng.random_bool(0.5) {
                -magnitude
            } else {
                magnitude
            }
        })
        .collect();
    check_unary::<float8>("atan", &input, |v| v.atan(), f32::atan);
    check_unary::<float16>("atan", &input, |v| v.atan(), f32::atan);
}

#[test]
fn test_atan2_precision_random_inputs() {
    let ys = random_inputs(3, 4096, -5.0, 5.0);
    let xs = random_inputs(4, 4096, -5.0, 5.0);
    for (yc, xc) in ys.chunks_exact(8).zip(xs.chunks_exact(8)) {
        let out = float8::from_slice(yc).atan2(float8::from_slice(xc)).to_vec();
        for i in 0..8 {
            let expected = yc[i].atan2(xc[i]);
            assert!(
                ulps(out[i], expected) <= MAX_ULPS,
                "atan2({}, {}) = {}, expected {expected}",
                yc[i],
                xc[i],
                out[i]
            );
        }
    }
}

#[test]
fn test_cbrt_precision_random_inputs() {
    let mut rng = StdRng::seed_from_u64(2024);
    let input: Vec<f32> = (0..4096)
        .map(|_| {
            let magnitude = 10f32.powf(rng.random_range(-44.0..38.0));
            if rng.random_bool(0.5) {
                -magnitude
            } else {
                magnitude
            }
        })
        .collect();
    check_unary::<float8>("cbrt", &input, |v| v.cbrt(), f32::cbrt);
    check_unary::<float16>("cbrt", &input, |v| v.cbrt(), f32::cbrt);
}

#[test]
fn test_double_precision_matches_std_exactly() {
    let mut rng = StdRng::seed_from_u64(5);
    let input: Vec<f64> = (0..256).map(|_| rng.random_range(-0.99..0.99)).collect();
    for chunk in input.chunks_exact(4) {
        let v = double4::from_slice(chunk);
        let (exp, asin, atan, cbrt) = (v.exp(), v.asin(), v.atan(), v.cbrt());
        for i in 0..4 {
            assert_eq!(exp.to_vec()[i], chunk[i].exp());
            assert_eq!(asin.to_vec()[i], chunk[i].asin());
            assert_eq!(atan.to_vec()[i], chunk[i].atan());
            assert_eq!(cbrt.to_vec()[i], chunk[i].cbrt());
        }
    }
}
