//! Wide logical vectors composed from narrower ones.
//!
//! `Emulated<S, N>` stores `N` vectors of type `S` side by side and applies
//! every operation to each slot independently. It implements [`SimdVec`]
//! itself, so compositions nest: `Emulated<Emulated<F32x4, 2>, 2>` is a
//! 16-lane vector built from four SSE registers.
//!
//! # Lane layout
//!
//! Slot `i` holds lanes `[i * S::LANES, (i + 1) * S::LANES)`. Loads and
//! stores walk the slots in order, and the bit-indexed operations
//! ([`signbits`](SimdVec::signbits) and [`blend_imm`](SimdVec::blend_imm))
//! give slot `i` the bits starting at `i * S::LANES`. Because lane indices
//! are bit positions of a `u64`, a composition may have at most 64 lanes.
//! Constructing a larger one, or one without slots, fails to compile:
//!
//! ```compile_fail
//! use simdtype::simd::{float4, Emulated, SimdVec};
//!
//! // 17 * 4 = 68 lanes
//! let v = Emulated::<float4, 17>::splat(-1.0);
//! assert_eq!(v.signbits(), u64::MAX);
//! ```
//!
//! ```compile_fail
//! use simdtype::simd::{double2, Emulated, SimdVec};
//!
//! let v = Emulated::<double2, 0>::from_slots([]);
//! let _ = v.sum();
//! ```
//!
//! # Example
//!
//! ```rust
//! use simdtype::simd::{float4, Emulated, SimdVec};
//!
//! type Float12 = Emulated<float4, 3>;
//!
//! let data: Vec<f32> = (0..12).map(|i| i as f32).collect();
//! let v = Float12::from_slice(&data);
//! assert_eq!(Float12::LANES, 12);
//! assert_eq!(v.sum(), 66.0);
//! assert_eq!(v.mask_ge(Float12::splat(10.0)).signbits(), 0b1100_0000_0000);
//! ```

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Sub, SubAssign,
};

use crate::simd::traits::{Select, SimdVec};

/// `N` vectors of type `S` acting as one vector of `N * S::LANES` lanes.
#[derive(Copy, Clone, PartialEq)]
#[repr(C)]
pub struct Emulated<S, const N: usize> {
    /// The constituent vectors, lowest lanes first.
    pub x: [S; N],
}

impl<S: SimdVec, const N: usize> Emulated<S, N> {
    const LANE_COUNT: usize = {
        assert!(N >= 1, "an emulated vector needs at least one slot");
        assert!(
            N * S::LANES <= 64,
            "emulated vectors are limited to 64 lanes"
        );
        N * S::LANES
    };

    /// Bits of an immediate or sign mask that belong to one slot.
    const SLOT_BITS: u64 = u64::MAX >> (64 - S::LANES);

    /// Evaluates the lane-count assertions for this instantiation. The
    /// constructors and every method that indexes or shifts by lane call it,
    /// so an oversized or empty composition is rejected at compile time even
    /// if `LANES` is never read.
    #[inline(always)]
    fn check_lanes() {
        let _: usize = const { Self::LANE_COUNT };
    }

    /// Joins `N` vectors into one, `slots[0]` providing the lowest lanes.
    #[inline(always)]
    pub fn from_slots(slots: [S; N]) -> Self {
        Self::check_lanes();
        Self { x: slots }
    }

    /// The constituent vectors, lowest lanes first.
    #[inline(always)]
    pub fn slots(&self) -> &[S; N] {
        &self.x
    }

    /// Splits the vector back into its constituents.
    #[inline(always)]
    pub fn into_slots(self) -> [S; N] {
        self.x
    }

    #[inline(always)]
    fn map_slots(self, mut f: impl FnMut(S) -> S) -> Self {
        let mut x = self.x;
        for slot in x.iter_mut() {
            *slot = f(*slot);
        }
        Self { x }
    }

    #[inline(always)]
    fn zip_slots(self, rhs: Self, mut f: impl FnMut(S, S) -> S) -> Self {
        let mut x = self.x;
        for (slot, other) in x.iter_mut().zip(rhs.x) {
            *slot = f(*slot, other);
        }
        Self { x }
    }

    #[inline(always)]
    fn zip3_slots(self, b: Self, c: Self, mut f: impl FnMut(S, S, S) -> S) -> Self {
        let mut x = self.x;
        for (i, slot) in x.iter_mut().enumerate() {
            *slot = f(*slot, b.x[i], c.x[i]);
        }
        Self { x }
    }
}

impl<S: SimdVec, const N: usize> fmt::Debug for Emulated<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emulated").field("x", &self.x).finish()
    }
}

impl<S: SimdVec, const N: usize> SimdVec for Emulated<S, N> {
    type Scalar = S::Scalar;
    const LANES: usize = Self::LANE_COUNT;
    const ALIGN: usize = S::ALIGN;

    #[inline(always)]
    fn splat(value: S::Scalar) -> Self {
        Self::check_lanes();
        Self {
            x: [S::splat(value); N],
        }
    }

    #[inline(always)]
    fn zeromask() -> Self {
        Self::check_lanes();
        Self { x: [S::zeromask(); N] }
    }

    #[inline(always)]
    fn onemask() -> Self {
        Self::check_lanes();
        Self { x: [S::onemask(); N] }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const S::Scalar) -> Self {
        Self::check_lanes();
        let mut x = [S::zeromask(); N];
        for (i, slot) in x.iter_mut().enumerate() {
            *slot = S::load(ptr.add(i * S::LANES));
        }
        Self { x }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const S::Scalar) -> Self {
        Self::check_lanes();
        let mut x = [S::zeromask(); N];
        for (i, slot) in x.iter_mut().enumerate() {
            *slot = S::loadu(ptr.add(i * S::LANES));
        }
        Self { x }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut S::Scalar) {
        Self::check_lanes();
        for (i, slot) in self.x.iter().enumerate() {
            slot.store(ptr.add(i * S::LANES));
        }
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut S::Scalar) {
        Self::check_lanes();
        for (i, slot) in self.x.iter().enumerate() {
            slot.storeu(ptr.add(i * S::LANES));
        }
    }

    #[inline(always)]
    fn first(self) -> S::Scalar {
        Self::check_lanes();
        self.x[0].first()
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::andnot)
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::mask_eq)
    }

    #[inline(always)]
    fn mask_neq(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::mask_neq)
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::mask_lt)
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::mask_le)
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::mask_gt)
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::mask_ge)
    }

    #[inline(always)]
    fn signbits(self) -> u64 {
        Self::check_lanes();
        self.x
            .iter()
            .enumerate()
            .fold(0, |bits, (i, slot)| bits | (slot.signbits() << (i * S::LANES)))
    }

    /// Adds the slots left to right as vectors, `((x[0] + x[1]) + x[2]) + ..`,
    /// then reduces the accumulator with `S::sum`. The association is fixed
    /// for a given tier, so repeated sums of the same lanes are identical,
    /// but it differs from a sequential scalar loop and between tiers.
    #[inline(always)]
    fn sum(self) -> S::Scalar {
        Self::check_lanes();
        let acc = self.x[1..].iter().fold(self.x[0], |acc, &slot| acc + slot);
        acc.sum()
    }

    #[inline(always)]
    fn fold_lanes<F>(self, init: S::Scalar, mut f: F) -> S::Scalar
    where
        F: FnMut(S::Scalar, S::Scalar) -> S::Scalar,
    {
        self.x
            .iter()
            .fold(init, |acc, slot| slot.fold_lanes(acc, &mut f))
    }

    #[inline(always)]
    fn map_lanes<F>(self, mut f: F) -> Self
    where
        F: FnMut(S::Scalar) -> S::Scalar,
    {
        self.map_slots(|slot| slot.map_lanes(&mut f))
    }

    #[inline(always)]
    fn zip_lanes<F>(self, other: Self, mut f: F) -> Self
    where
        F: FnMut(S::Scalar, S::Scalar) -> S::Scalar,
    {
        self.zip_slots(other, |a, b| a.zip_lanes(b, &mut f))
    }

    #[inline(always)]
    fn abs(self) -> Self {
        self.map_slots(S::abs)
    }

    #[inline(always)]
    fn copysign(self, sign: Self) -> Self {
        self.zip_slots(sign, S::copysign)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.zip_slots(rhs, S::max)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        self.map_slots(S::sqrt)
    }

    #[inline(always)]
    fn fmuladd(self, b: Self, c: Self) -> Self {
        self.zip3_slots(b, c, S::fmuladd)
    }

    #[inline(always)]
    fn fmulsub(self, b: Self, c: Self) -> Self {
        self.zip3_slots(b, c, S::fmulsub)
    }

    #[inline(always)]
    fn blendv(self, other: Self, mask: Self) -> Self {
        self.zip3_slots(other, mask, S::blendv)
    }

    #[inline(always)]
    fn blend_imm(self, other: Self, imm: u64) -> Self {
        Self::check_lanes();
        let mut x = self.x;
        for (i, slot) in x.iter_mut().enumerate() {
            let bits = (imm >> (i * S::LANES)) & Self::SLOT_BITS;
            *slot = slot.blend_imm(other.x[i], bits);
        }
        Self { x }
    }

    #[inline(always)]
    unsafe fn gather(stride: usize, x: *const S::Scalar) -> Self {
        Self::check_lanes();
        let mut out = [S::zeromask(); N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = S::gather(stride, x.add(i * S::LANES * stride));
        }
        Self { x: out }
    }

    #[inline(always)]
    unsafe fn scatter(self, stride: usize, x: *mut S::Scalar) {
        Self::check_lanes();
        for (i, slot) in self.x.iter().enumerate() {
            slot.scatter(stride, x.add(i * S::LANES * stride));
        }
    }
}

impl<S: SimdVec, const N: usize> Select for Emulated<S, N> {
    type Mask = Self;

    #[inline(always)]
    fn select(a: Self, b: Self, mask: Self) -> Self {
        a.blendv(b, mask)
    }
}

macro_rules! emulated_binary_op {
    ($($op:ident, $method:ident, $op_assign:ident, $method_assign:ident);* $(;)?) => {
        $(
            impl<S: SimdVec, const N: usize> $op for Emulated<S, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    self.zip_slots(rhs, S::$method)
                }
            }

            impl<S: SimdVec, const N: usize> $op_assign for Emulated<S, N> {
                #[inline(always)]
                fn $method_assign(&mut self, rhs: Self) {
                    *self = $op::$method(*self, rhs);
                }
            }
        )*
    };
}

emulated_binary_op! {
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
    BitAnd, bitand, BitAndAssign, bitand_assign;
    BitOr, bitor, BitOrAssign, bitor_assign;
    BitXor, bitxor, BitXorAssign, bitxor_assign;
}

/// Scalar operands in both orders. Written per scalar type so the impls stay
/// coherent for every `S`.
macro_rules! emulated_scalar_op {
    ($scalar:ty => $($op:ident, $method:ident, $op_assign:ident, $method_assign:ident);* $(;)?) => {
        $(
            impl<S: SimdVec<Scalar = $scalar>, const N: usize> $op<$scalar> for Emulated<S, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: $scalar) -> Self {
                    $op::$method(self, Self::splat(rhs))
                }
            }

            impl<S: SimdVec<Scalar = $scalar>, const N: usize> $op<Emulated<S, N>> for $scalar {
                type Output = Emulated<S, N>;

                #[inline(always)]
                fn $method(self, rhs: Emulated<S, N>) -> Emulated<S, N> {
                    $op::$method(Emulated::<S, N>::splat(self), rhs)
                }
            }

            impl<S: SimdVec<Scalar = $scalar>, const N: usize> $op_assign<$scalar> for Emulated<S, N> {
                #[inline(always)]
                fn $method_assign(&mut self, rhs: $scalar) {
                    *self = $op::$method(*self, rhs);
                }
            }
        )*
    };
}

emulated_scalar_op! {
    f32 =>
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
}

emulated_scalar_op! {
    f64 =>
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
}

impl<S: SimdVec, const N: usize> Neg for Emulated<S, N> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self.map_slots(S::neg)
    }
}

impl<S: SimdVec, const N: usize> Not for Emulated<S, N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self.map_slots(S::not)
    }
}
