//! Width aliases resolved against the compiled tier, plus `select` and `blend`.
//!
//! Generic numeric code names a logical width (`float8`, `double16`, ...) and
//! this module decides, per build tier, whether that width is a single
//! hardware register or an [`Emulated`] composition:
//!
//! | alias      | `scalar` .. `sse42`     | `avx`, `avx2`          |
//! |------------|-------------------------|------------------------|
//! | `float4`   | `F32x4`                 | `F32x4`                |
//! | `float8`   | `Emulated<float4, 2>`   | `F32x8`                |
//! | `float16`  | `Emulated<float4, 4>`   | `Emulated<float8, 2>`  |
//! | `double2`  | `F64x2`                 | `F64x2`                |
//! | `double4`  | `Emulated<double2, 2>`  | `F64x4`                |
//! | `double8`  | `Emulated<double2, 4>`  | `Emulated<double4, 2>` |
//! | `double16` | `Emulated<double2, 8>`  | `Emulated<double4, 4>` |
//!
//! On the `scalar` tier `F32x4`/`F64x2` are the array-backed types from
//! [`portable`](crate::simd::portable). Whatever the mapping, every alias has
//! the lane count its name says, so results differ between tiers only by
//! rounding (FMA and horizontal summation order).

#![allow(non_camel_case_types)]

use crate::simd::emulated::Emulated;
use crate::simd::traits::{Select, SimdVec};

#[cfg(sse2)]
use crate::simd::sse as native128;

#[cfg(not(sse2))]
use crate::simd::portable as native128;

/// Four `f32` lanes.
pub type float4 = native128::F32x4;

/// Two `f64` lanes.
pub type double2 = native128::F64x2;

/// Eight `f32` lanes.
#[cfg(avx)]
pub type float8 = crate::simd::avx::F32x8;
/// Eight `f32` lanes.
#[cfg(not(avx))]
pub type float8 = Emulated<float4, 2>;

/// Four `f64` lanes.
#[cfg(avx)]
pub type double4 = crate::simd::avx::F64x4;
/// Four `f64` lanes.
#[cfg(not(avx))]
pub type double4 = Emulated<double2, 2>;

/// Sixteen `f32` lanes.
#[cfg(avx)]
pub type float16 = Emulated<float8, 2>;
/// Sixteen `f32` lanes.
#[cfg(not(avx))]
pub type float16 = Emulated<float4, 4>;

/// Eight `f64` lanes.
#[cfg(avx)]
pub type double8 = Emulated<double4, 2>;
/// Eight `f64` lanes.
#[cfg(not(avx))]
pub type double8 = Emulated<double2, 4>;

/// Sixteen `f64` lanes.
#[cfg(avx)]
pub type double16 = Emulated<double4, 4>;
/// Sixteen `f64` lanes.
#[cfg(not(avx))]
pub type double16 = Emulated<double2, 8>;

/// Per-lane choice: lanes of `b` where `mask` is set, lanes of `a` elsewhere.
///
/// For vectors `mask` is a comparison result (each lane all-ones or
/// all-zeros); for `f32`/`f64` it is a `bool`. No branches are taken for
/// vectors.
///
/// ```rust
/// use simdtype::simd::{select, float4, SimdVec};
///
/// let x = float4::from_slice(&[-1.0, 2.0, -3.0, 4.0]);
/// let relu = select(x, float4::zero(), x.mask_lt(float4::zero()));
/// assert_eq!(relu.to_vec(), vec![0.0, 2.0, 0.0, 4.0]);
/// assert_eq!(select(1.0f64, 2.0, true), 2.0);
/// ```
#[inline(always)]
pub fn select<V: Select>(a: V, b: V, mask: V::Mask) -> V {
    V::select(a, b, mask)
}

/// Per-lane choice by a compile-time immediate: bit `i` of `IMM` set takes
/// lane `i` from `b`, clear takes it from `a`.
///
/// Lane `i` is the `i`-th scalar in memory, so the immediate reads
/// right-to-left against a stored array.
///
/// ```rust
/// use simdtype::simd::{blend, float4, SimdVec};
///
/// let v = blend::<0b1010, _>(float4::splat(1.0), float4::splat(2.0));
/// assert_eq!(v.to_vec(), vec![1.0, 2.0, 1.0, 2.0]);
/// ```
#[inline(always)]
pub fn blend<const IMM: u64, V: SimdVec>(a: V, b: V) -> V {
    debug_assert!(
        V::LANES == 64 || IMM >> V::LANES == 0,
        "blend immediate has bits beyond the vector's lanes"
    );
    a.blend_imm(b, IMM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes_match<V: SimdVec>(expected: usize) {
        assert_eq!(V::LANES, expected);
        assert_eq!(
            std::mem::size_of::<V>(),
            expected * std::mem::size_of::<V::Scalar>()
        );
    }

    #[test]
    fn test_alias_widths() {
        lanes_match::<float4>(4);
        lanes_match::<float8>(8);
        lanes_match::<float16>(16);
        lanes_match::<double2>(2);
        lanes_match::<double4>(4);
        lanes_match::<double8>(8);
        lanes_match::<double16>(16);
    }

    #[test]
    fn test_aliases_fit_default_alignment() {
        assert!(float16::ALIGN <= crate::DEFAULT_ALIGNMENT);
        assert!(double16::ALIGN <= crate::DEFAULT_ALIGNMENT);
    }

    #[test]
    fn test_blend_example() {
        let v = blend::<0b1010, _>(float4::splat(1.0), float4::splat(2.0));
        let mut out = [0.0f32; 4];
        v.write_to_slice(&mut out);
        assert_eq!(out, [1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_blend_wide() {
        let v = blend::<0xF00F, _>(double16::zero(), double16::splat(1.0));
        assert_eq!(v.mask_eq(double16::splat(1.0)).signbits(), 0xF00F);
        assert_eq!(v.sum(), 8.0);
    }

    #[test]
    fn test_select_vector_and_scalar() {
        let a = double4::splat(1.0);
        let b = double4::splat(2.0);
        let mask = double4::from_slice(&[0.0, 1.0, 2.0, 3.0]).mask_gt(double4::splat(1.5));
        assert_eq!(select(a, b, mask).to_vec(), vec![1.0, 1.0, 2.0, 2.0]);
        assert_eq!(select(a, b, double4::zeromask()).to_vec(), a.to_vec());
        assert_eq!(select(a, b, double4::onemask()).to_vec(), b.to_vec());
        assert_eq!(select(3.0f32, 4.0, false), 3.0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "blend immediate has bits beyond the vector's lanes")]
    fn test_blend_rejects_extra_bits() {
        let _ = blend::<0b1_0000, _>(float4::zero(), float4::zero());
    }
}
