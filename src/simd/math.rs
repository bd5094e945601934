//! Transcendental and rounding functions for every vector width.
//!
//! Every method of [`SimdMath`] defaults to applying the scalar
//! [`num::Float`] routine to each lane, which matches the standard library
//! bit for bit. The portable and SSE vectors and `F64x4` use those defaults.
//! On the `avx2` tier `F32x8` evaluates `exp`, `asin`, `acos`, `atan`,
//! `atan2` and `cbrt` in the register with polynomial kernels, accurate to a
//! few ULP. [`Emulated`] vectors forward every method to their slots, so a
//! `float16` made of two `F32x8` runs the kernels on both halves.
//!
//! # Example
//!
//! ```rust
//! use simdtype::simd::{double4, SimdMath, SimdVec};
//!
//! let angles = double4::from_slice(&[0.0, 0.5, 1.0, 1.5]);
//! let (s, c) = angles.sincos();
//! let one = s * s + c * c;
//! for lane in one.to_vec() {
//!     assert!((lane - 1.0).abs() < 1e-15);
//! }
//! ```

use num::Float;

use crate::simd::emulated::Emulated;
use crate::simd::portable;
use crate::simd::traits::SimdVec;

/// Lane-wise elementary functions.
pub trait SimdMath: SimdVec {
    /// Natural logarithm.
    #[inline]
    fn ln(self) -> Self {
        self.map_lanes(Float::ln)
    }

    #[inline]
    fn log2(self) -> Self {
        self.map_lanes(Float::log2)
    }

    #[inline]
    fn log10(self) -> Self {
        self.map_lanes(Float::log10)
    }

    /// `e^x`.
    #[inline]
    fn exp(self) -> Self {
        self.map_lanes(Float::exp)
    }

    /// `2^x`.
    #[inline]
    fn exp2(self) -> Self {
        self.map_lanes(Float::exp2)
    }

    #[inline]
    fn sin(self) -> Self {
        self.map_lanes(Float::sin)
    }

    #[inline]
    fn cos(self) -> Self {
        self.map_lanes(Float::cos)
    }

    /// `(sin x, cos x)`.
    #[inline]
    fn sincos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    #[inline]
    fn tan(self) -> Self {
        self.map_lanes(Float::tan)
    }

    #[inline]
    fn asin(self) -> Self {
        self.map_lanes(Float::asin)
    }

    #[inline]
    fn acos(self) -> Self {
        self.map_lanes(Float::acos)
    }

    #[inline]
    fn atan(self) -> Self {
        self.map_lanes(Float::atan)
    }

    /// Four-quadrant arctangent of `self / x`, with `self` as `y`.
    #[inline]
    fn atan2(self, x: Self) -> Self {
        self.zip_lanes(x, Float::atan2)
    }

    /// `self^exponent`.
    #[inline]
    fn pow(self, exponent: Self) -> Self {
        self.zip_lanes(exponent, Float::powf)
    }

    #[inline]
    fn cbrt(self) -> Self {
        self.map_lanes(Float::cbrt)
    }

    #[inline]
    fn floor(self) -> Self {
        self.map_lanes(Float::floor)
    }

    #[inline]
    fn ceil(self) -> Self {
        self.map_lanes(Float::ceil)
    }

    /// `sqrt(self² + other²)` without intermediate overflow.
    #[inline]
    fn hypot(self, other: Self) -> Self {
        self.zip_lanes(other, Float::hypot)
    }
}

impl SimdMath for portable::F32x4 {}
impl SimdMath for portable::F64x2 {}

#[cfg(sse2)]
impl SimdMath for crate::simd::sse::F32x4 {}
#[cfg(sse2)]
impl SimdMath for crate::simd::sse::F64x2 {}

#[cfg(avx)]
impl SimdMath for crate::simd::avx::F64x4 {}

/// Applies a unary slot function to every slot.
#[inline(always)]
fn per_slot<S: SimdMath, const N: usize>(v: Emulated<S, N>, f: fn(S) -> S) -> Emulated<S, N> {
    Emulated::from_slots(v.into_slots().map(f))
}

/// Applies a binary slot function to matching slots.
#[inline(always)]
fn per_slot_pair<S: SimdMath, const N: usize>(
    a: Emulated<S, N>,
    b: Emulated<S, N>,
    f: fn(S, S) -> S,
) -> Emulated<S, N> {
    let mut x = a.into_slots();
    for (slot, other) in x.iter_mut().zip(b.into_slots()) {
        *slot = f(*slot, other);
    }
    Emulated::from_slots(x)
}

impl<S: SimdMath, const N: usize> SimdMath for Emulated<S, N> {
    #[inline]
    fn ln(self) -> Self {
        per_slot(self, S::ln)
    }

    #[inline]
    fn log2(self) -> Self {
        per_slot(self, S::log2)
    }

    #[inline]
    fn log10(self) -> Self {
        per_slot(self, S::log10)
    }

    #[inline]
    fn exp(self) -> Self {
        per_slot(self, S::exp)
    }

    #[inline]
    fn exp2(self) -> Self {
        per_slot(self, S::exp2)
    }

    #[inline]
    fn sin(self) -> Self {
        per_slot(self, S::sin)
    }

    #[inline]
    fn cos(self) -> Self {
        per_slot(self, S::cos)
    }

    #[inline]
    fn sincos(self) -> (Self, Self) {
        let mut sin = self.into_slots();
        let mut cos = sin;
        for (s, c) in sin.iter_mut().zip(cos.iter_mut()) {
            (*s, *c) = s.sincos();
        }
        (Self::from_slots(sin), Self::from_slots(cos))
    }

    #[inline]
    fn tan(self) -> Self {
        per_slot(self, S::tan)
    }

    #[inline]
    fn asin(self) -> Self {
        per_slot(self, S::asin)
    }

    #[inline]
    fn acos(self) -> Self {
        per_slot(self, S::acos)
    }

    #[inline]
    fn atan(self) -> Self {
        per_slot(self, S::atan)
    }

    #[inline]
    fn atan2(self, x: Self) -> Self {
        per_slot_pair(self, x, S::atan2)
    }

    #[inline]
    fn pow(self, exponent: Self) -> Self {
        per_slot_pair(self, exponent, S::pow)
    }

    #[inline]
    fn cbrt(self) -> Self {
        per_slot(self, S::cbrt)
    }

    #[inline]
    fn floor(self) -> Self {
        per_slot(self, S::floor)
    }

    #[inline]
    fn ceil(self) -> Self {
        per_slot(self, S::ceil)
    }

    #[inline]
    fn hypot(self, other: Self) -> Self {
        per_slot_pair(self, other, S::hypot)
    }
}
