//! AVX 8-lane f32 vector.
//!
//! `F32x8` wraps Intel's `__m256` register to operate on 8 single-precision
//! values at once.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Sandy Bridge / AMD Bulldozer or later for AVX,
//!   Haswell / Excavator or later for the fused multiply-add path
//! - **Compilation**: `-C target-feature=+avx` (or `+avx2,+fma`)
//!
//! # Memory Alignment
//!
//! Aligned transfers (`vmovaps`) need 32-byte aligned pointers. Buffers from
//! [`AlignedBuf`](crate::utils::AlignedBuf) satisfy this by default.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;

use crate::simd::strided;
use crate::simd::traits::{SimdBase, SimdVec};

/// AVX memory alignment requirement in bytes.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// Number of f32 elements that fit in an AVX 256-bit vector.
pub(crate) const LANE_COUNT: usize = 8;

/// AVX vector containing 8 packed f32 values.
///
/// # Usage
///
/// ```rust
/// # #[cfg(target_feature = "avx")]
/// # {
/// use simdtype::simd::avx::F32x8;
/// use simdtype::simd::{SimdBase, SimdVec};
///
/// let v = F32x8::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
/// assert_eq!(v.sum(), 36.0);
/// assert_eq!(v.mask_gt(F32x8::splat(4.0)).signbits(), 0b1111_0000);
/// # }
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x8 {
    /// The underlying AVX register.
    pub elements: __m256,
}

impl F32x8 {
    /// Builds a vector from lanes given high to low: `e0` ends up in lane 0.
    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    pub fn new(e7: f32, e6: f32, e5: f32, e4: f32, e3: f32, e2: f32, e1: f32, e0: f32) -> Self {
        Self {
            elements: unsafe { _mm256_set_ps(e7, e6, e5, e4, e3, e2, e1, e0) },
        }
    }

    #[inline(always)]
    fn sign_mask() -> __m256 {
        unsafe { _mm256_set1_ps(-0.0) }
    }

    #[inline(always)]
    fn mask_from_bits(imm: u64) -> Self {
        let bit = |i: u32| -(((imm >> i) & 1) as i32);
        Self {
            elements: unsafe {
                _mm256_castsi256_ps(_mm256_setr_epi32(
                    bit(0),
                    bit(1),
                    bit(2),
                    bit(3),
                    bit(4),
                    bit(5),
                    bit(6),
                    bit(7),
                ))
            },
        }
    }

    #[inline(always)]
    fn compare<const PREDICATE: i32>(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_cmp_ps::<PREDICATE>(self.elements, rhs.elements) },
        }
    }
}

impl fmt::Debug for F32x8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x8").field(&self.to_array()).finish()
    }
}

impl PartialEq for F32x8 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl SimdVec for F32x8 {
    type Scalar = f32;
    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = AVX_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_ps(value) },
        }
    }

    #[inline(always)]
    fn zeromask() -> Self {
        Self {
            elements: unsafe { _mm256_setzero_ps() },
        }
    }

    #[inline(always)]
    fn onemask() -> Self {
        Self {
            elements: unsafe { _mm256_castsi256_ps(_mm256_set1_epi32(-1)) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, AVX_ALIGNMENT),
            "aligned load from a misaligned pointer"
        );
        Self {
            elements: _mm256_load_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        Self {
            elements: _mm256_loadu_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        debug_assert!(
            crate::utils::is_aligned(ptr, AVX_ALIGNMENT),
            "aligned store to a misaligned pointer"
        );
        _mm256_store_ps(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");
        _mm256_storeu_ps(ptr, self.elements)
    }

    #[inline(always)]
    fn first(self) -> f32 {
        unsafe { _mm256_cvtss_f32(self.elements) }
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_andnot_ps(self.elements, rhs.elements) },
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
        unsafe { _mm256_movemask_ps(self.elements) as u32 as u64 }
    }

    /// Adds the two 128-bit halves, then reduces the four partial sums with `haddps`.
    #[inline(always)]
    fn sum(self) -> f32 {
        unsafe {
            let low = _mm256_castps256_ps128(self.elements);
            let high = _mm256_extractf128_ps::<1>(self.elements);
            let quad = _mm_add_ps(low, high);
            let pairs = _mm_hadd_ps(quad, quad);
            _mm_cvtss_f32(_mm_hadd_ps(pairs, pairs))
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
            elements: unsafe { _mm256_andnot_ps(Self::sign_mask(), self.elements) },
        }
    }

    #[inline(always)]
    fn copysign(self, sign: Self) -> Self {
        unsafe {
            let mask = Self::sign_mask();
            Self {
                elements: _mm256_or_ps(
                    _mm256_and_ps(sign.elements, mask),
                    _mm256_andnot_ps(mask, self.elements),
                ),
            }
        }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { _mm256_sqrt_ps(self.elements) },
        }
    }

    #[inline(always)]
    fn fmuladd(self, b: Self, c: Self) -> Self {
        #[cfg(avx2)]
        unsafe {
            Self {
                elements: _mm256_fmadd_ps(self.elements, b.elements, c.elements),
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
                elements: _mm256_fmsub_ps(self.elements, b.elements, c.elements),
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
            elements: unsafe { _mm256_blendv_ps(self.elements, other.elements, mask.elements) },
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

impl SimdBase for F32x8 {
    type Array = [f32; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm256_loadu_ps(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    fn to_array(self) -> [f32; LANE_COUNT] {
        let mut lanes = [0.0; LANE_COUNT];
        unsafe { _mm256_storeu_ps(lanes.as_mut_ptr(), self.elements) };
        lanes
    }
}

impl_arith_op!(F32x8, f32, Add, add, AddAssign, add_assign, |a, b| F32x8 {
    elements: unsafe { _mm256_add_ps(a.elements, b.elements) }
});
impl_arith_op!(F32x8, f32, Sub, sub, SubAssign, sub_assign, |a, b| F32x8 {
    elements: unsafe { _mm256_sub_ps(a.elements, b.elements) }
});
impl_arith_op!(F32x8, f32, Mul, mul, MulAssign, mul_assign, |a, b| F32x8 {
    elements: unsafe { _mm256_mul_ps(a.elements, b.elements) }
});
impl_arith_op!(F32x8, f32, Div, div, DivAssign, div_assign, |a, b| F32x8 {
    elements: unsafe { _mm256_div_ps(a.elements, b.elements) }
});

impl_bit_op!(F32x8, BitAnd, bitand, BitAndAssign, bitand_assign, |a, b| F32x8 {
    elements: unsafe { _mm256_and_ps(a.elements, b.elements) }
});
impl_bit_op!(F32x8, BitOr, bitor, BitOrAssign, bitor_assign, |a, b| F32x8 {
    elements: unsafe { _mm256_or_ps(a.elements, b.elements) }
});
impl_bit_op!(F32x8, BitXor, bitxor, BitXorAssign, bitxor_assign, |a, b| F32x8 {
    elements: unsafe { _mm256_xor_ps(a.elements, b.elements) }
});

impl_unary_ops!(F32x8);
