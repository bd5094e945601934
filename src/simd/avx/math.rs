//! Elementary functions on [`F32x8`].
//!
//! On the `avx2` tier, `exp`, `asin`, `acos`, `atan`, `atan2` and `cbrt` are
//! evaluated entirely in the register: range reduction, a polynomial in
//! Horner form using fused multiply-add, and blends for the special values.
//! They need FMA and the 256-bit integer instructions, so plain AVX builds
//! keep the lane-wise defaults of [`SimdMath`].
//!
//! # Accuracy
//!
//! | Function | Domain | Max error |
//! |----------|--------|-----------|
//! | `exp`   | all reals, subnormal results included | 4 ULP |
//! | `asin`  | [-1, 1], NaN outside | 4 ULP |
//! | `acos`  | [-1, 1], NaN outside | 4 ULP |
//! | `atan`  | all reals | 4 ULP |
//! | `atan2` | all reals, IEEE 754 signed zeros and infinities | 4 ULP |
//! | `cbrt`  | all reals, subnormals included | 2 ULP |
//!
//! Signed zeros, infinities and NaN follow `f32`'s own functions.

#[cfg(all(avx2, target_arch = "x86"))]
use std::arch::x86::*;

#[cfg(all(avx2, target_arch = "x86_64"))]
use std::arch::x86_64::*;

use crate::simd::avx::F32x8;
use crate::simd::math::SimdMath;

impl SimdMath for F32x8 {
    #[cfg(avx2)]
    #[inline]
    fn exp(self) -> Self {
        Self {
            elements: unsafe { exp_ps(self.elements) },
        }
    }

    #[cfg(avx2)]
    #[inline]
    fn asin(self) -> Self {
        Self {
            elements: unsafe { asin_ps(self.elements) },
        }
    }

    #[cfg(avx2)]
    #[inline]
    fn acos(self) -> Self {
        Self {
            elements: unsafe { acos_ps(self.elements) },
        }
    }

    #[cfg(avx2)]
    #[inline]
    fn atan(self) -> Self {
        Self {
            elements: unsafe { atan_ps(self.elements) },
        }
    }

    #[cfg(avx2)]
    #[inline]
    fn atan2(self, x: Self) -> Self {
        Self {
            elements: unsafe { atan2_ps(self.elements, x.elements) },
        }
    }

    #[cfg(avx2)]
    #[inline]
    fn cbrt(self) -> Self {
        Self {
            elements: unsafe { cbrt_ps(self.elements) },
        }
    }
}

// ================================================================================================
// HELPERS
// ================================================================================================

#[cfg(avx2)]
#[inline(always)]
unsafe fn sign_of(x: __m256) -> __m256 {
    _mm256_and_ps(x, _mm256_set1_ps(-0.0))
}

#[cfg(avx2)]
#[inline(always)]
unsafe fn abs_ps(x: __m256) -> __m256 {
    _mm256_andnot_ps(_mm256_set1_ps(-0.0), x)
}

/// `|magnitude|` carrying the sign bit of `sign`.
#[cfg(avx2)]
#[inline(always)]
unsafe fn copysign_ps(magnitude: __m256, sign: __m256) -> __m256 {
    _mm256_or_ps(abs_ps(magnitude), sign_of(sign))
}

/// `c[0] + z * (c[1] + z * (c[2] + ..))`.
#[cfg(avx2)]
#[inline(always)]
unsafe fn horner<const N: usize>(z: __m256, c: [f32; N]) -> __m256 {
    let mut acc = _mm256_set1_ps(c[N - 1]);
    for i in (0..N - 1).rev() {
        acc = _mm256_fmadd_ps(acc, z, _mm256_set1_ps(c[i]));
    }
    acc
}

// ================================================================================================
// EXPONENTIAL
// ================================================================================================

/// Largest input with a finite result, `ln(f32::MAX)` rounded down.
#[cfg(avx2)]
const EXP_MAX_INPUT: f32 = 88.722_83;

/// Below this even the smallest subnormal rounds to zero.
#[cfg(avx2)]
const EXP_MIN_INPUT: f32 = -103.972_08;

/// `ln 2` split so that `n * LN2_HI` is exact for every reachable `n`.
#[cfg(avx2)]
const LN2_HI: f32 = 0.693_359_4;
#[cfg(avx2)]
const LN2_LO: f32 = -2.121_944_4e-4;

/// Taylor coefficients of `e^r` up to `r^6 / 6!`.
#[cfg(avx2)]
const EXP_COEFFS: [f32; 7] = [
    1.0,
    1.0,
    0.5,
    0.166_666_67,
    0.041_666_668,
    0.008_333_334,
    0.001_388_889,
];

/// `e^x` as `2^n * e^r` with `|r| <= ln(2) / 2`.
#[cfg(avx2)]
#[inline]
unsafe fn exp_ps(x: __m256) -> __m256 {
    let overflow = _mm256_cmp_ps(x, _mm256_set1_ps(EXP_MAX_INPUT), _CMP_GT_OQ);
    let underflow = _mm256_cmp_ps(x, _mm256_set1_ps(EXP_MIN_INPUT), _CMP_LT_OQ);
    let is_nan = _mm256_cmp_ps(x, x, _CMP_UNORD_Q);

    let n = _mm256_round_ps(
        _mm256_mul_ps(x, _mm256_set1_ps(std::f32::consts::LOG2_E)),
        _MM_FROUND_TO_NEAREST_INT,
    );
    let r = _mm256_fnmadd_ps(n, _mm256_set1_ps(LN2_HI), x);
    let r = _mm256_fnmadd_ps(n, _mm256_set1_ps(LN2_LO), r);
    let p = horner(r, EXP_COEFFS);

    // 2^n as two factors: n spans [-150, 128] and a single biased exponent
    // cannot hold either end
    let n = _mm256_cvtps_epi32(n);
    let half = _mm256_srai_epi32(n, 1);
    let rest = _mm256_sub_epi32(n, half);
    let bias = _mm256_set1_epi32(127);
    let scale_a = _mm256_castsi256_ps(_mm256_slli_epi32(_mm256_add_epi32(half, bias), 23));
    let scale_b = _mm256_castsi256_ps(_mm256_slli_epi32(_mm256_add_epi32(rest, bias), 23));
    let y = _mm256_mul_ps(_mm256_mul_ps(p, scale_a), scale_b);

    let y = _mm256_blendv_ps(y, _mm256_set1_ps(f32::INFINITY), overflow);
    let y = _mm256_blendv_ps(y, _mm256_setzero_ps(), underflow);
    _mm256_blendv_ps(y, x, is_nan)
}

// ================================================================================================
// INVERSE TRIGONOMETRIC
// ================================================================================================

/// Series of `(asin(x) - x) / x^3` in `z = x^2`, through `x^21`. Exact to
/// well under an ULP on `[0, 1/2]`.
#[cfg(avx2)]
const ASIN_COEFFS: [f32; 10] = [
    0.166_666_67,
    0.075,
    0.044_642_857,
    0.030_381_944,
    0.022_372_159,
    0.017_352_764,
    0.013_964_844,
    0.011_551_800,
    0.009_761_609,
    0.008_390_335,
];

/// Minimax fit of `atan(t) / t` in `t^2` on `[0, 1]`.
#[cfg(avx2)]
const ATAN_COEFFS: [f32; 9] = [
    0.999_999_9,
    -0.333_325_24,
    0.199_848_85,
    -0.141_548_07,
    0.104_775_39,
    -0.071_943_84,
    0.039_345_413,
    -0.014_152_348,
    0.002_398_139,
];

/// `asin` of `a = |d|` on the reduced argument.
///
/// Returns `(s, large)`: for `a < 1/2`, `s = asin(a)`; where `large` is set,
/// `s = asin(sqrt((1 - a) / 2))`, which is half of `acos(a)`.
#[cfg(avx2)]
#[inline(always)]
unsafe fn asin_reduced(a: __m256) -> (__m256, __m256) {
    let half = _mm256_set1_ps(0.5);
    let large = _mm256_cmp_ps(a, half, _CMP_GE_OQ);
    let folded = _mm256_sqrt_ps(_mm256_mul_ps(_mm256_sub_ps(_mm256_set1_ps(1.0), a), half));
    let x = _mm256_blendv_ps(a, folded, large);
    let z = _mm256_mul_ps(x, x);
    let p = horner(z, ASIN_COEFFS);
    (_mm256_fmadd_ps(_mm256_mul_ps(p, z), x, x), large)
}

#[cfg(avx2)]
#[inline]
unsafe fn asin_ps(d: __m256) -> __m256 {
    let a = abs_ps(d);
    let out_of_domain = _mm256_cmp_ps(a, _mm256_set1_ps(1.0), _CMP_GT_OQ);

    let (s, large) = asin_reduced(a);
    // asin(a) = pi/2 - 2 asin(sqrt((1 - a) / 2))
    let folded = _mm256_fnmadd_ps(
        _mm256_set1_ps(2.0),
        s,
        _mm256_set1_ps(std::f32::consts::FRAC_PI_2),
    );
    let r = _mm256_or_ps(_mm256_blendv_ps(s, folded, large), sign_of(d));
    _mm256_blendv_ps(r, _mm256_set1_ps(f32::NAN), out_of_domain)
}

#[cfg(avx2)]
#[inline]
unsafe fn acos_ps(d: __m256) -> __m256 {
    let a = abs_ps(d);
    let out_of_domain = _mm256_cmp_ps(a, _mm256_set1_ps(1.0), _CMP_GT_OQ);

    let (s, large) = asin_reduced(a);
    // |d| < 1/2: pi/2 - asin(d)
    let near = _mm256_sub_ps(
        _mm256_set1_ps(std::f32::consts::FRAC_PI_2),
        _mm256_or_ps(s, sign_of(d)),
    );
    // |d| >= 1/2: 2 asin(sqrt((1 - |d|) / 2)), reflected through pi/2 for d < 0
    let twice = _mm256_add_ps(s, s);
    let far = _mm256_blendv_ps(
        twice,
        _mm256_sub_ps(_mm256_set1_ps(std::f32::consts::PI), twice),
        d,
    );
    let r = _mm256_blendv_ps(near, far, large);
    _mm256_blendv_ps(r, _mm256_set1_ps(f32::NAN), out_of_domain)
}

#[cfg(avx2)]
#[inline]
unsafe fn atan_ps(x: __m256) -> __m256 {
    let one = _mm256_set1_ps(1.0);
    let a = abs_ps(x);

    // atan(a) = pi/2 - atan(1/a) for a >= 1
    let inverted = _mm256_cmp_ps(a, one, _CMP_GE_OQ);
    let t = _mm256_blendv_ps(a, _mm256_div_ps(one, a), inverted);
    let p = _mm256_mul_ps(horner(_mm256_mul_ps(t, t), ATAN_COEFFS), t);
    let r = _mm256_blendv_ps(
        p,
        _mm256_sub_ps(_mm256_set1_ps(std::f32::consts::FRAC_PI_2), p),
        inverted,
    );
    _mm256_or_ps(r, sign_of(x))
}

/// Four-quadrant arctangent of `y / x`.
///
/// `atan(y / x)` is shifted by `pi` toward the sign of `y` in the left
/// half-plane. The axes and infinite operands are then patched in.
#[cfg(avx2)]
#[inline]
unsafe fn atan2_ps(y: __m256, x: __m256) -> __m256 {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    let zero = _mm256_setzero_ps();
    let inf = _mm256_set1_ps(f32::INFINITY);
    let any_nan = _mm256_cmp_ps(x, y, _CMP_UNORD_Q);
    let x_zero = _mm256_cmp_ps(x, zero, _CMP_EQ_OQ);
    let y_zero = _mm256_cmp_ps(y, zero, _CMP_EQ_OQ);
    let x_inf = _mm256_cmp_ps(abs_ps(x), inf, _CMP_EQ_OQ);
    let y_inf = _mm256_cmp_ps(abs_ps(y), inf, _CMP_EQ_OQ);

    let pi_y = copysign_ps(_mm256_set1_ps(PI), y);
    let half_pi_y = copysign_ps(_mm256_set1_ps(FRAC_PI_2), y);

    let x_safe = _mm256_blendv_ps(x, _mm256_set1_ps(1.0), x_zero);
    let base = atan_ps(_mm256_div_ps(y, x_safe));
    // blendv keys on the sign bit, so x = -0.0 and x = -inf count as left
    let mut r = _mm256_blendv_ps(base, _mm256_add_ps(base, pi_y), x);

    // y axis
    r = _mm256_blendv_ps(r, half_pi_y, x_zero);
    // origin: y for x = +0, pi with the sign of y for x = -0
    r = _mm256_blendv_ps(r, _mm256_blendv_ps(y, pi_y, x), _mm256_and_ps(x_zero, y_zero));

    // y infinite: pi/2 for finite x, pi/4 or 3pi/4 for infinite x
    let corner = _mm256_blendv_ps(
        _mm256_set1_ps(FRAC_PI_4),
        _mm256_set1_ps(3.0 * FRAC_PI_4),
        x,
    );
    let steep = copysign_ps(_mm256_blendv_ps(_mm256_set1_ps(FRAC_PI_2), corner, x_inf), y);
    r = _mm256_blendv_ps(r, steep, y_inf);

    _mm256_blendv_ps(r, _mm256_set1_ps(f32::NAN), any_nan)
}

// ================================================================================================
// CUBE ROOT
// ================================================================================================

/// Added to a third of the bit pattern to seed the root within a few percent.
#[cfg(avx2)]
const CBRT_SEED_BIAS: i32 = 709_958_130;

#[cfg(avx2)]
#[inline]
unsafe fn cbrt_ps(x: __m256) -> __m256 {
    let a = abs_ps(x);
    let keep = _mm256_or_ps(
        _mm256_cmp_ps(a, _mm256_setzero_ps(), _CMP_EQ_OQ),
        _mm256_cmp_ps(a, _mm256_set1_ps(f32::INFINITY), _CMP_EQ_UQ),
    );

    // subnormals: cbrt(a * 2^24) = cbrt(a) * 2^8
    let tiny = _mm256_cmp_ps(a, _mm256_set1_ps(f32::MIN_POSITIVE), _CMP_LT_OQ);
    let a = _mm256_blendv_ps(a, _mm256_mul_ps(a, _mm256_set1_ps(16_777_216.0)), tiny);

    let third = _mm256_set1_ps(1.0 / 3.0);
    let bits = _mm256_cvtps_epi32(_mm256_mul_ps(
        _mm256_cvtepi32_ps(_mm256_castps_si256(a)),
        third,
    ));
    let mut y = _mm256_castsi256_ps(_mm256_add_epi32(bits, _mm256_set1_epi32(CBRT_SEED_BIAS)));

    // Newton: y -= (y - a / y^2) / 3
    for _ in 0..4 {
        let residual = _mm256_sub_ps(y, _mm256_div_ps(a, _mm256_mul_ps(y, y)));
        y = _mm256_fnmadd_ps(residual, third, y);
    }

    let y = _mm256_blendv_ps(y, _mm256_mul_ps(y, _mm256_set1_ps(1.0 / 256.0)), tiny);
    _mm256_blendv_ps(copysign_ps(y, x), x, keep)
}
