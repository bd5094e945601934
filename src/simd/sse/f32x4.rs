//! SSE 4-lane f32 vector.
//!
//! `F32x4` wraps an `__m128` register holding four single-precision values.
//! Lane 0 is the lowest address in memory and the lowest element of the
//! register, so `F32x4::new(e3, e2, e1, e0)` follows `_mm_set_ps` order while
//! [`SimdBase::from_array`] follows memory order.
//!
//! # Memory Alignment
//!
//! [`SimdVec::load`] and [`SimdVec::store`] map to `movaps` and need 16-byte
//! aligned pointers; [`SimdVec::loadu`] and [`SimdVec::storeu`] accept any
//! address.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;

use crate::simd::strided;
use crate::simd::traits::{SimdBase, SimdVec};

/// Alignment of `__m128` in bytes.
pub(crate) const SSE_ALIGNMENT: usize = 16;

/// Number of f32 lanes in an SSE register.
pub(crate) const LANE_COUNT: usize = 4;

/// SSE vector containing 4 packed f32 values.
///
/// # Usage
///
/// ```rust
/// # #[cfg(target_feature = "sse2")]
/// # {
/// use simdtype::simd::sse::F32x4;
/// use simdtype::simd::{SimdBase, SimdVec};
///
/// let v = F32x4::from_array([1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(v.first(), 1.0);
/// assert_eq!(v.sum(), 10.0);
/// assert_eq!(F32x4::new(4.0, 3.0, 2.0, 1.0).to_array(), v.to_array());
/// # }
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4 {
    /// The underlying SSE register.
    pub elements: __m128,
}

impl F32x4 {
    /// Builds a vector from lanes given high to low: `e0` ends up in lane 0.
    #[inline(always)]
    pub fn new(e3: f32, e2: f32, e1: f32, e0: f32) -> Self {
        Self {
            elements: unsafe { _mm_set_ps(e3, e2, e1, e0) },
        }
    }

    #[inline(always)]
    fn sign_mask() -> __m128 {
        unsafe { _mm_set1_ps(-0.0) }
    }

    /// Expands the low four bits of `imm` into a lane mask.
    #[inline(always)]
    fn mask_from_bits(imm: u64) -> Self {
        let bit = |i: u32| -(((imm >> i) & 1) as i32);
        Self {
            elements: unsafe { _mm_castsi128_ps(_mm_setr_epi32(bit(0), bit(1), bit(2), bit(3))) },
        }
    }
}

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x4").field(&self.to_array()).finish()
    }
}

impl PartialEq for F32x4 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl SimdVec for F32x4 {
    type Scalar = f32;
    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = SSE_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm_set1_ps(value) },
        }
    }

    #[inline(always)]
    fn zeromask() -> Self {
        Self {
            elements: unsafe { _mm_setzero_ps() },
        }
    }

    #[inline(always)]
    fn onemask() -> Self {
        Self {
            elements: unsafe { _mm_castsi128_ps(_mm_set1_epi32(-1)) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, SSE_ALIGNMENT),
            "aligned load from a misaligned pointer"
        );
        Self {
            elements: _mm_load_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        Self {
            elements: _mm_loadu_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, SSE_ALIGNMENT),
            "aligned store to a misaligned pointer"
        );
        _mm_store_ps(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        _mm_storeu_ps(ptr, self.elements)
    }

    #[inline(always)]
    fn first(self) -> f32 {
        unsafe { _mm_cvtss_f32(self.elements) }
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_andnot_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpeq_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_neq(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpneq_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmplt_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmple_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpgt_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_cmpge_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn signbits(self) -> u64 {
        unsafe { _mm_movemask_ps(self.elements) as u64 }
    }

    /// Sums as `(e0 + e1) + (e2 + e3)` with SSE3, `(e0 + e2) + (e1 + e3)` without.
    #[inline(always)]
    fn sum(self) -> f32 {
        #[cfg(sse3)]
        unsafe {
            let pairs = _mm_hadd_ps(self.elements, self.elements);
            _mm_cvtss_f32(_mm_hadd_ps(pairs, pairs))
        }

        #[cfg(not(sse3))]
        unsafe {
            let high = _mm_movehl_ps(self.elements, self.elements);
            let pairs = _mm_add_ps(self.elements, high);
            let odd = _mm_shuffle_ps::<0b01>(pairs, pairs);
            _mm_cvtss_f32(_mm_add_ss(pairs, odd))
        }
    }

    #[inline(always)]
    fn fold_lanes<F>(self, init: f32, f: F) -> f32
    where
        F: FnMut(f32, f32) -> f32,
    {
        self.to_array().into_iter().fold(init, f)
    }

    #[inline(always)]
    fn map_lanes<F>(self, mut f: F) -> Self
    where
        F: FnMut(f32) -> f32,
    {
        Self::from_array(self.to_array().map(&mut f))
    }

    #[inline(always)]
    fn zip_lanes<F>(self, other: Self, mut f: F) -> Self
    where
        F: FnMut(f32, f32) -> f32,
    {
        let mut lanes = self.to_array();
        for (lane, rhs) in lanes.iter_mut().zip(other.to_array()) {
            *lane = f(*lane, rhs);
        }
        Self::from_array(lanes)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm_andnot_ps(Self::sign_mask(), self.elements) },
        }
    }

    #[inline(always)]
    fn copysign(self, sign: Self) -> Self {
        unsafe {
            let mask = Self::sign_mask();
            Self {
                elements: _mm_or_ps(
                    _mm_and_ps(sign.elements, mask),
                    _mm_andnot_ps(mask, self.elements),
                ),
            }
        }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { _mm_sqrt_ps(self.elements) },
        }
    }

    #[inline(always)]
    fn fmuladd(self, b: Self, c: Self) -> Self {
        #[cfg(avx2)]
        unsafe {
            Self {
                elements: _mm_fmadd_ps(self.elements, b.elements, c.elements),
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
                elements: _mm_fmsub_ps(self.elements, b.elements, c.elements),
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
                elements: _mm_blendv_ps(self.elements, other.elements, mask.elements),
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
    unsafe fn gather(stride: usize, x: *const f32) -> Self {
        strided::gather(stride, x)
    }

    #[inline(always)]
    unsafe fn scatter(self, stride: usize, x: *mut f32) {
        strided::scatter(self, stride, x)
    }

    #[inline(always)]
    unsafe fn pack(stride: usize, x: *const f32, out: &mut [Self]) {
        strided::pack(stride, x, out)
    }

    #[inline(always)]
    unsafe fn unpack(input: &[Self], stride: usize, x: *mut f32) {
        strided::unpack(input, stride, x)
    }
}

impl SimdBase for F32x4 {
    type Array = [f32; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm_loadu_ps(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    fn to_array(self) -> [f32; LANE_COUNT] {
        let mut lanes = [0.0; LANE_COUNT];
        unsafe { _mm_storeu_ps(lanes.as_mut_ptr(), self.elements) };
        lanes
    }
}

impl_arith_op!(F32x4, f32, Add, add, AddAssign, add_assign, |a, b| F32x4 {
    elements: unsafe { _mm_add_ps(a.elements, b.elements) }
});
impl_arith_op!(F32x4, f32, Sub, sub, SubAssign, sub_assign, |a, b| F32x4 {
    elements: unsafe { _mm_sub_ps(a.elements, b.elements) }
});
impl_arith_op!(F32x4, f32, Mul, mul, MulAssign, mul_assign, |a, b| F32x4 {
    elements: unsafe { _mm_mul_ps(a.elements, b.elements) }
});
impl_arith_op!(F32x4, f32, Div, div, DivAssign, div_assign, |a, b| F32x4 {
    elements: unsafe { _mm_div_ps(a.elements, b.elements) }
});

impl_bit_op!(F32x4, BitAnd, bitand, BitAndAssign, bitand_assign, |a, b| F32x4 {
    elements: unsafe { _mm_and_ps(a.elements, b.elements) }
});
impl_bit_op!(F32x4, BitOr, bitor, BitOrAssign, bitor_assign, |a, b| F32x4 {
    elements: unsafe { _mm_or_ps(a.elements, b.elements) }
});
impl_bit_op!(F32x4, BitXor, bitxor, BitXorAssign, bitxor_assign, |a, b| F32x4 {
    elements: unsafe { _mm_xor_ps(a.elements, b.elements) }
});

impl_unary_ops!(F32x4);
