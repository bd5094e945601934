//! AVX 4-lane f64 vector.
//!
//! `F64x4` wraps an `__m256d` register. It shares the alignment and lane
//! order rules of [`F32x8`](super::F32x8).

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;

use crate::simd::strided;
use crate::simd::traits::{SimdBase, SimdVec};

use super::f32x8::AVX_ALIGNMENT;

/// Number of f64 elements that fit in an AVX 256-bit vector.
pub(crate) const LANE_COUNT: usize = 4;

/// AVX vector containing 4 packed f64 values.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F64x4 {
    /// The underlying AVX register.
    pub elements: __m256d,
}

impl F64x4 {
    /// Builds a vector from lanes given high to low: `e0` ends up in lane 0.
    #[inline(always)]
    pub fn new(e3: f64, e2: f64, e1: f64, e0: f64) -> Self {
        Self {
            elements: unsafe { _mm256_set_pd(e3, e2, e1, e0) },
        }
    }

    #[inline(always)]
    fn sign_mask() -> __m256d {
        unsafe { _mm256_set1_pd(-0.0) }
    }

    #[inline(always)]
    fn mask_from_bits(imm: u64) -> Self {
        let bit = |i: u32| -(((imm >> i) & 1) as i64);
        Self {
            elements: unsafe {
                _mm256_castsi256_pd(_mm256_setr_epi64x(bit(0), bit(1), bit(2), bit(3)))
            },
        }
    }

    #[inline(always)]
    fn compare<const PREDICATE: i32>(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_cmp_pd::<PREDICATE>(self.elements, rhs.elements) },
        }
    }
}

impl fmt::Debug for F64x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F64x4").field(&self.to_array()).finish()
    }
}

impl PartialEq for F64x4 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl SimdVec for F64x4 {
    type Scalar = f64;
    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = AVX_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { _mm256_set1_pd(value) },
        }
    }

    #[inline(always)]
    fn zeromask() -> Self {
        Self {
            elements: unsafe { _mm256_setzero_pd() },
        }
    }

    #[inline(always)]
    fn onemask() -> Self {
        Self {
            elements: unsafe { _mm256_castsi256_pd(_mm256_set1_epi32(-1)) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, AVX_ALIGNMENT),
            "aligned load from a misaligned pointer"
        );
        Self {
            elements: _mm256_load_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        Self {
            elements: _mm256_loadu_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, AVX_ALIGNMENT),
            "aligned store to a misaligned pointer"
        );
        _mm256_store_pd(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        _mm256_storeu_pd(ptr, self.elements)
    }

    #[inline(always)]
    fn first(self) -> f64 {
        unsafe { _mm256_cvtsd_f64(self.elements) }
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_andnot_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        self.compare::<_CMP_EQ_OQ>(rhs)
    }

    #[inline(always)]
    fn mask_neq(self, rhs: Self) -> Self {
        self.compare::<_CMP_NEQ_UQ>(rhs)
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        self.compare::<_CMP_LT_OQ>(rhs)
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self {
        self.compare::<_CMP_LE_OQ>(rhs)
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        self.compare::<_CMP_GT_OQ>(rhs)
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self {
        self.compare::<_CMP_GE_OQ>(rhs)
    }

    #[inline(always)]
    fn signbits(self) -> u64 {
        unsafe { _mm256_movemask_pd(self.elements) as u64 }
    }

    #[inline(always)]
    fn sum(self) -> f64 {
        unsafe {
            let low = _mm256_castpd256_pd128(self.elements);
            let high = _mm256_extractf128_pd::<1>(self.elements);
            let pair = _mm_add_pd(low, high);
            _mm_cvtsd_f64(_mm_hadd_pd(pair, pair))
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
        let mut lanes = self.to_array();
        for (lane, rhs) in lanes.iter_mut().zip(other.to_array()) {
            *lane = f(*lane, rhs);
        }
        Self::from_array(lanes)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm256_andnot_pd(Self::sign_mask(), self.elements) },
        }
    }

    #[inline(always)]
    fn copysign(self, sign: Self) -> Self {
        unsafe {
            let mask = Self::sign_mask();
            Self {
                elements: _mm256_or_pd(
                    _mm256_and_pd(sign.elements, mask),
                    _mm256_andnot_pd(mask, self.elements),
                ),
            }
        }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { _mm256_sqrt_pd(self.elements) },
        }
    }

    #[inline(always)]
    fn fmuladd(self, b: Self, c: Self) -> Self {
        #[cfg(avx2)]
        unsafe {
            Self {
                elements: _mm256_fmadd_pd(self.elements, b.elements, c.elements),
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
                elements: _mm256_fmsub_pd(self.elements, b.elements, c.elements),
            }
        }

        #[cfg(not(avx2))]
        {
            self * b - c
        }
    }

    #[inline(always)]
    fn blendv(self, other: Self, mask: Self) -> Self {
        Self {
            elements: unsafe { _mm256_blendv_pd(self.elements, other.elements, mask.elements) },
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

impl SimdBase for F64x4 {
    type Array = [f64; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [f64; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm256_loadu_pd(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    fn to_array(self) -> [f64; LANE_COUNT] {
        let mut lanes = [0.0; LANE_COUNT];
        unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), self.elements) };
        lanes
    }
}

impl_arith_op!(F64x4, f64, Add, add, AddAssign, add_assign, |a, b| F64x4 {
    elements: unsafe { _mm256_add_pd(a.elements, b.elements) }
});
impl_arith_op!(F64x4, f64, Sub, sub, SubAssign, sub_assign, |a, b| F64x4 {
    elements: unsafe { _mm256_sub_pd(a.elements, b.elements) }
});
impl_arith_op!(F64x4, f64, Mul, mul, MulAssign, mul_assign, |a, b| F64x4 {
    elements: unsafe { _mm256_mul_pd(a.elements, b.elements) }
});
impl_arith_op!(F64x4, f64, Div, div, DivAssign, div_assign, |a, b| F64x4 {
    elements: unsafe { _mm256_div_pd(a.elements, b.elements) }
});

impl_bit_op!(F64x4, BitAnd, bitand, BitAndAssign, bitand_assign, |a, b| F64x4 {
    elements: unsafe { _mm256_and_pd(a.elements, b.elements) }
});
impl_bit_op!(F64x4, BitOr, bitor, BitOrAssign, bitor_assign, |a, b| F64x4 {
    elements: unsafe { _mm256_or_pd(a.elements, b.elements) }
});
impl_bit_op!(F64x4, BitXor, bitxor, BitXorAssign, bitxor_assign, |a, b| F64x4 {
    elements: unsafe { _mm256_xor_pd(a.elements, b.elements) }
});

impl_unary_ops!(F64x4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_order_and_sum() {
        let v = F64x4::new(4.0, 3.0, 2.0, 1.0);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.sum(), 10.0);
    }

    #[test]
    fn test_blend_imm() {
        let a = F64x4::splat(1.0);
        let b = F64x4::splat(2.0);
        assert_eq!(a.blend_imm(b, 0b1010).to_array(), [1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_gather_scatter() {
        let x: Vec<f64> = (0..16).map(f64::from).collect();
        let v = F64x4::gather_slice(5, &x);
        assert_eq!(v.to_array(), [0.0, 5.0, 10.0, 15.0]);

        let mut y = vec![0.0; 7];
        (v + 1.0).scatter_slice(2, &mut y);
        assert_eq!(y, vec![1.0, 0.0, 6.0, 0.0, 11.0, 0.0, 16.0]);
    }

    #[test]
    fn test_copysign_and_neg() {
        let v = F64x4::from_array([1.0, -2.0, 3.0, -4.0]);
        assert_eq!((-v).to_array(), [-1.0, 2.0, -3.0, 4.0]);
        assert_eq!(
            F64x4::splat(5.0).copysign(v).to_array(),
            [5.0, -5.0, 5.0, -5.0]
        );
    }
}
