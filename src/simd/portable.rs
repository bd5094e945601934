//! Array-backed lane vectors for targets without an x86 vector unit.
//!
//! [`F32x4`] and [`F64x2`] here have the exact surface and lane order of the
//! SSE types and the same memory footprint and alignment (16 bytes). They are
//! the native `float4`/`double2` when the build tier is `scalar`, and are
//! always compiled so that any target can check the SIMD backends against a
//! plain lane-by-lane reference.
//!
//! Semantics mirror the hardware where it matters: `min`/`max` return the
//! second operand when either lane is NaN (like `minps`/`maxps`), comparisons
//! are ordered except `mask_neq`, and `fmuladd` rounds twice.

use crate::simd::strided;
use crate::simd::traits::{SimdBase, SimdScalar, SimdVec};

macro_rules! portable_lanes {
    ($(#[$doc:meta])* $name:ident, $scalar:ty, $lanes:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, PartialEq)]
        #[repr(C, align(16))]
        pub struct $name {
            pub elements: [$scalar; $lanes],
        }

        impl $name {
            #[inline(always)]
            fn map(self, mut f: impl FnMut($scalar) -> $scalar) -> Self {
                let mut elements = self.elements;
                for lane in elements.iter_mut() {
                    *lane = f(*lane);
                }
                Self { elements }
            }

            #[inline(always)]
            fn zip(self, rhs: Self, mut f: impl FnMut($scalar, $scalar) -> $scalar) -> Self {
                let mut elements = self.elements;
                for (lane, other) in elements.iter_mut().zip(rhs.elements) {
                    *lane = f(*lane, other);
                }
                Self { elements }
            }

            #[inline(always)]
            fn compare(self, rhs: Self, f: impl Fn($scalar, $scalar) -> bool) -> Self {
                self.zip(rhs, |a, b| <$scalar as SimdScalar>::mask(f(a, b)))
            }
        }

        impl SimdVec for $name {
            type Scalar = $scalar;
            const LANES: usize = $lanes;
            const ALIGN: usize = 16;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self { elements: [value; $lanes] }
            }

            #[inline(always)]
            fn zeromask() -> Self {
                Self::splat(0.0)
            }

            #[inline(always)]
            fn onemask() -> Self {
                Self::splat(<$scalar as SimdScalar>::all_ones())
            }

            #[inline(always)]
            unsafe fn load(ptr: *const $scalar) -> Self {
                debug_assert!(!ptr.is_null(), "Pointer must not be null");
                debug_assert!(
                    crate::utils::is_aligned(ptr, Self::ALIGN),
                    "aligned load from a misaligned pointer"
                );
                Self { elements: *(ptr as *const [$scalar; $lanes]) }
            }

            #[inline(always)]
            unsafe fn loadu(ptr: *const $scalar) -> Self {
                debug_assert!(!ptr.is_null(), "Pointer must not be null");
                Self { elements: std::ptr::read_unaligned(ptr as *const [$scalar; $lanes]) }
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $scalar) {
                debug_assert!(!ptr.is_null(), "Pointer must not be null");
                debug_assert!(
                    crate::utils::is_aligned(ptr, Self::ALIGN),
                    "aligned store to a misaligned pointer"
                );
                *(ptr as *mut [$scalar; $lanes]) = self.elements;
            }

            #[inline(always)]
            unsafe fn storeu(self, ptr: *mut $scalar) {
                debug_assert!(!ptr.is_null(), "Pointer must not be null");
                std::ptr::write_unaligned(ptr as *mut [$scalar; $lanes], self.elements);
            }

            #[inline(always)]
            fn first(self) -> $scalar {
                self.elements[0]
            }

            #[inline(always)]
            fn andnot(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a.bit_not().bit_and(b))
            }

            #[inline(always)]
            fn mask_eq(self, rhs: Self) -> Self {
                self.compare(rhs, |a, b| a == b)
            }

            #[inline(always)]
            fn mask_neq(self, rhs: Self) -> Self {
                self.compare(rhs, |a, b| a != b)
            }

            #[inline(always)]
            fn mask_lt(self, rhs: Self) -> Self {
                self.compare(rhs, |a, b| a < b)
            }

            #[inline(always)]
            fn mask_le(self, rhs: Self) -> Self {
                self.compare(rhs, |a, b| a <= b)
            }

            #[inline(always)]
            fn mask_gt(self, rhs: Self) -> Self {
                self.compare(rhs, |a, b| a > b)
            }

            #[inline(always)]
            fn mask_ge(self, rhs: Self) -> Self {
                self.compare(rhs, |a, b| a >= b)
            }

            #[inline(always)]
            fn signbits(self) -> u64 {
                self.elements
                    .iter()
                    .enumerate()
                    .fold(0, |bits, (i, lane)| bits | ((lane.sign_bit() as u64) << i))
            }

            #[inline(always)]
            fn sum(self) -> $scalar {
                self.elements.iter().fold(0.0, |acc, &lane| acc + lane)
            }

            #[inline(always)]
            fn fold_lanes<F>(self, init: $scalar, f: F) -> $scalar
            where
                F: FnMut($scalar, $scalar) -> $scalar,
            {
                self.elements.into_iter().fold(init, f)
            }

            #[inline(always)]
            fn map_lanes<F>(self, f: F) -> Self
            where
                F: FnMut($scalar) -> $scalar,
            {
                self.map(f)
            }

            #[inline(always)]
            fn zip_lanes<F>(self, other: Self, f: F) -> Self
            where
                F: FnMut($scalar, $scalar) -> $scalar,
            {
                self.zip(other, f)
            }

            #[inline(always)]
            fn abs(self) -> Self {
                Self::splat(-0.0).andnot(self)
            }

            #[inline(always)]
            fn copysign(self, sign: Self) -> Self {
                let sign_mask = Self::splat(-0.0);
                (sign & sign_mask) | sign_mask.andnot(self)
            }

            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| if a < b { a } else { b })
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| if a > b { a } else { b })
            }

            #[inline(always)]
            fn sqrt(self) -> Self {
                self.map(<$scalar>::sqrt)
            }

            #[inline(always)]
            fn fmuladd(self, b: Self, c: Self) -> Self {
                self * b + c
            }

            #[inline(always)]
            fn fmulsub(self, b: Self, c: Self) -> Self {
                self * b - c
            }

            #[inline(always)]
            fn blendv(self, other: Self, mask: Self) -> Self {
                (mask & other) | mask.andnot(self)
            }

            #[inline(always)]
            fn blend_imm(self, other: Self, imm: u64) -> Self {
                let mut elements = self.elements;
                for (i, lane) in elements.iter_mut().enumerate() {
                    if (imm >> i) & 1 == 1 {
                        *lane = other.elements[i];
                    }
                }
                Self { elements }
            }

            #[inline(always)]
            unsafe fn gather(stride: usize, x: *const $scalar) -> Self {
                strided::gather(stride, x)
            }

            #[inline(always)]
            unsafe fn scatter(self, stride: usize, x: *mut $scalar) {
                strided::scatter(self, stride, x)
            }

            #[inline(always)]
            unsafe fn pack(stride: usize, x: *const $scalar, out: &mut [Self]) {
                strided::pack(stride, x, out)
            }

            #[inline(always)]
            unsafe fn unpack(input: &[Self], stride: usize, x: *mut $scalar) {
                strided::unpack(input, stride, x)
            }
        }

        impl SimdBase for $name {
            type Array = [$scalar; $lanes];

            #[inline(always)]
            fn from_array(lanes: [$scalar; $lanes]) -> Self {
                Self { elements: lanes }
            }

            #[inline(always)]
            fn to_array(self) -> [$scalar; $lanes] {
                self.elements
            }
        }

        impl_arith_op!($name, $scalar, Add, add, AddAssign, add_assign,
            |a, b| a.zip(b, |x, y| x + y));
        impl_arith_op!($name, $scalar, Sub, sub, SubAssign, sub_assign,
            |a, b| a.zip(b, |x, y| x - y));
        impl_arith_op!($name, $scalar, Mul, mul, MulAssign, mul_assign,
            |a, b| a.zip(b, |x, y| x * y));
        impl_arith_op!($name, $scalar, Div, div, DivAssign, div_assign,
            |a, b| a.zip(b, |x, y| x / y));

        impl_bit_op!($name, BitAnd, bitand, BitAndAssign, bitand_assign,
            |a, b| a.zip(b, |x, y| x.bit_and(y)));
        impl_bit_op!($name, BitOr, bitor, BitOrAssign, bitor_assign,
            |a, b| a.zip(b, |x, y| x.bit_or(y)));
        impl_bit_op!($name, BitXor, bitxor, BitXorAssign, bitxor_assign,
            |a, b| a.zip(b, |x, y| x.bit_xor(y)));

        impl_unary_ops!($name);
    };
}

portable_lanes!(
    /// Four `f32` lanes in a 16-byte aligned array.
    F32x4, f32, 4
);

portable_lanes!(
    /// Two `f64` lanes in a 16-byte aligned array.
    F64x2, f64, 2
);

impl F32x4 {
    /// Builds a vector from lanes given high to low: `e0` ends up in lane 0.
    #[inline(always)]
    pub fn new(e3: f32, e2: f32, e1: f32, e0: f32) -> Self {
        Self {
            elements: [e0, e1, e2, e3],
        }
    }
}

impl F64x2 {
    /// Builds a vector from lanes given high to low: `e0` ends up in lane 0.
    #[inline(always)]
    pub fn new(e1: f64, e0: f64) -> Self {
        Self { elements: [e0, e1] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_high_to_low() {
        assert_eq!(F32x4::new(1.0, 2.0, 3.0, 4.0).to_array(), [4.0, 3.0, 2.0, 1.0]);
        assert_eq!(F64x2::new(1.0, 2.0).first(), 2.0);
    }

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<F32x4>(), 16);
        assert_eq!(std::mem::align_of::<F32x4>(), 16);
        assert_eq!(std::mem::size_of::<F64x2>(), 16);
    }

    #[test]
    fn test_nan_min_max_returns_second_operand() {
        let nan = F32x4::splat(f32::NAN);
        let one = F32x4::splat(1.0);
        assert_eq!(nan.min(one).first(), 1.0);
        assert!(one.min(nan).first().is_nan());
        assert_eq!(nan.max(one).first(), 1.0);
    }

    #[test]
    fn test_abs_and_copysign() {
        let v = F64x2::from_array([-2.0, 3.0]);
        assert_eq!(v.abs().to_array(), [2.0, 3.0]);
        let s = F64x2::from_array([1.0, -1.0]);
        assert_eq!(v.copysign(s).to_array(), [2.0, -3.0]);
    }

    #[test]
    fn test_mask_neq_is_unordered() {
        let nan = F64x2::splat(f64::NAN);
        assert_eq!(nan.mask_neq(nan).signbits(), 0b11);
        assert_eq!(nan.mask_eq(nan).signbits(), 0);
    }
}
