//! SSE 2-lane f64 vector.
//!
//! `F64x2` wraps an `__m128d` register. Lane order and alignment rules are
//! those of [`F32x4`](super::F32x4): lane 0 is the low element,
//! `F64x2::new(e1, e0)` follows `_mm_set_pd` order, and aligned transfers
//! need 16-byte pointers.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;

use crate::simd::strided;
use crate::simd::traits::{SimdBase, SimdVec};

use super::f32x4::SSE_ALIGNMENT;

/// Number of f64 lanes in an SSE register.
pub(crate) const LANE_COUNT: usize = 2;

/// SSE vector containing 2 packed f64 values.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F64x2 {
    /// The underlying SSE register.
    pub elements: __m128d,
}

impl F64x2 {
    /// Builds a vector from lanes given high to low: `e0` ends up in lane 0.
    #[inline(always)]
    pub fn new(e1: f64, e0: f64) -> Self {
        Self {
            elements: unsafe { _mm_set_pd(e1, e0) },
        }
    }

    #[inline(always)]
    fn sign_mask() -> __m128d {
        unsafe { _mm_set1_pd(-0.0) }
    }

    #[inline(always)]
    fn mask_from_bits(imm: u64) -> Self {
        let bit = |i: u32| -(((imm >> i) & 1) as i64);
        Self {
            elements: unsafe { _mm_castsi128_pd(_mm_set_epi64x(bit(1), bit(0))) },
        }
    }
}

impl fmt::Debug for F64x2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F64x2").field(&self.to_array()).finish()
    }
}

impl PartialEq for F64x2 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl SimdVec for F64x2 {
    type Scalar = f64;
    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = SSE_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { _mm_set1_pd(value) },
        }
    }

    #[inline(always)]
    fn zeromask() -> Self {
        Self {
            elements: unsafe { _mm_setzero_pd() },
        }
    }

    #[inline(always)]
    fn onemask() -> Self {
        Self {
            elements: unsafe { _mm_castsi128_pd(_mm_set1_epi32(-1)) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, SSE_ALIGNMENT),
            "aligned load from a misaligned pointer"
        );
        Self {
            elements: _mm_load_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        Self {
            elements: _mm_loadu_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, SSE_ALIGNMENT),
            "aligned store to a misaligned pointer"
        );
        _mm_store_pd(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        _mm_storeu_pd(ptr, self.elements)
    }

    #[inline(always)]
    fn first(self) -> f64 {
        unsafe { _mm_cvtsd_f64(self.elements) }
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_andnot_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpeq_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_neq(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpneq_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmplt_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmple_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpgt_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpge_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn signbits(self) -> u64 {
        unsafe { _mm_movemask_pd(self.elements) as u64 }
    }

    #[inline(always)]
    fn sum(self) -> f64 {
        #[cfg(sse3)]
        unsafe {
            _mm_cvtsd_f64(_mm_hadd_pd(self.elements, self.elements))
        }

        #[cfg(not(sse3))]
        unsafe {
            let high = _mm_unpackhi_pd(self.elements, self.elements);
            _mm_cvtsd_f64(_mm_add_sd(self.elements, high))
        }
    }

    #[inline(always)]
    fn fold_lanes<F>(self, init: f64, f: F) -> f64
    where
        F: FnMut(f64, f64) -> f64,
    {
        self.to_array().into_iter().fold(init, f)
    }

    #[inline(always)]
    fn map_lanes<F>(self, mut f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        Self::from_array(self.to_array().map(&mut f))
    }

    #[inline(always)]
    fn zip_lanes<F>(self, other: Self, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> f64,
    {
        let [a0, a1] = self.to_array();
        let [b0, b1] = other.to_array();
        Self::from_array([f(a0, b0), f(a1, b1)])
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm_andnot_pd(Self::sign_mask(), self.elements) },
        }
    }

    #[inline(always)]
    fn copysign(self, sign: Self) -> Self {
        unsafe {
            let mask = Self::sign_mask();
            Self {
                elements: _mm_or_pd(
                    _mm_and_pd(sign.elements, mask),
                    _mm_andnot_pd(mask, self.elements),
                ),
            }
        }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { _mm_sqrt_pd(self.elements) },
        }
    }

    #[inline(always)]
    fn fmuladd(self, b: Self, c: Self) -> Self {
        #[cfg(avx2)]
        unsafe {
            Self {
                elements: _mm_fmadd_pd(self.elements, b.elements, c.elements),
            }
        }

        #[cfg(not(avx2))]
        {
            self * b + c
        }
    }

    #[inline(always)]
    fn fmulsub(self, b: Self, c: Self) -> Self {
        #[cfg(avx2)]
        unsafe {
            Self {
                elements: _mm_fmsub_pd(self.elements, b.elements, c.elements),
            }
        }

        #[cfg(not(avx2))]
        {
            self * b - c
        }
    }

    #[inline(always)]
    fn blendv(self, other: Self, mask: Self) -> Self {
        #[cfg(sse41)]
        unsafe {
            Self {
                elements: _mm_blendv_pd(self.elements, other.elements, mask.elements),
            }
        }

        #[cfg(not(sse41))]
        {
            (mask & other) | mask.andnot(self)
        }
    }

    #[inline(always)]
    fn blend_imm(self, other: Self, imm: u64) -> Self {
        self.blendv(other, Self::mask_from_bits(imm))
    }

    #[inline(always)]
    unsafe fn gather(stride: usize, x: *const f64) -> Self {
        strided::gather(stride, x)
    }

    #[inline(always)]
    unsafe fn scatter(self, stride: usize, x: *mut f64) {
        strided::scatter(self, stride, x)
    }

    #[inline(always)]
    unsafe fn pack(stride: usize, x: *const f64, out: &mut [Self]) {
        strided::pack(stride, x, out)
    }

    #[inline(always)]
    unsafe fn unpack(input: &[Self], stride: usize, x: *mut f64) {
        strided::unpack(input, stride, x)
    }
}

impl SimdBase for F64x2 {
    type Array = [f64; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [f64; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm_loadu_pd(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    fn to_array(self) -> [f64; LANE_COUNT] {
        let mut lanes = [0.0; LANE_COUNT];
        unsafe { _mm_storeu_pd(lanes.as_mut_ptr(), self.elements) };
        lanes
    }
}

impl_arith_op!(F64x2, f64, Add, add, AddAssign, add_assign, |a, b| F64x2 {
    elements: unsafe { _mm_add_pd(a.elements, b.elements) }
});
impl_arith_op!(F64x2, f64, Sub, sub, SubAssign, sub_assign, |a, b| F64x2 {
    elements: unsafe { _mm_sub_pd(a.elements, b.elements) }
});
impl_arith_op!(F64x2, f64, Mul, mul, MulAssign, mul_assign, |a, b| F64x2 {
    elements: unsafe { _mm_mul_pd(a.elements, b.elements) }
});
impl_arith_op!(F64x2, f64, Div, div, DivAssign, div_assign, |a, b| F64x2 {
    elements: unsafe { _mm_div_pd(a.elements, b.elements) }
});

impl_bit_op!(F64x2, BitAnd, bitand, BitAndAssign, bitand_assign, |a, b| F64x2 {
    elements: unsafe { _mm_and_pd(a.elements, b.elements) }
});
impl_bit_op!(F64x2, BitOr, bitor, BitOrAssign, bitor_assign, |a, b| F64x2 {
    elements: unsafe { _mm_or_pd(a.elements, b.elements) }
});
impl_bit_op!(F64x2, BitXor, bitxor, BitXorAssign, bitxor_assign, |a, b| F64x2 {
    elements: unsafe { _mm_xor_pd(a.elements, b.elements) }
});

impl_unary_ops!(F64x2);
