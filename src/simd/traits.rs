//! The closed operation set shared by every lane vector.
//!
//! [`SimdVec`] is what generic numeric code is written against. Native
//! register wrappers and [`Emulated`](crate::simd::Emulated) compositions
//! implement it identically, so an algorithm coded once compiles unchanged
//! for `float4` on SSE2 or `double16` on AVX2.

use std::fmt::Debug;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Not, Sub,
    SubAssign,
};

/// Scalar element of a lane vector: `f32` or `f64`.
///
/// Besides the arithmetic from [`num::Float`], lanes need a bitwise view so
/// that masks (all-ones / all-zeros patterns) can be manipulated on backends
/// without a vector unit.
pub trait SimdScalar: num::Float + Default + Debug + Send + Sync + 'static {
    /// Size of one lane in bytes.
    const BYTES: usize;

    /// All bits set. This is a NaN and is only meaningful as a mask lane.
    fn all_ones() -> Self;
    fn bit_and(self, rhs: Self) -> Self;
    fn bit_or(self, rhs: Self) -> Self;
    fn bit_xor(self, rhs: Self) -> Self;
    fn bit_not(self) -> Self;
    /// `self` as a mask lane: all-ones when `flag` is true.
    fn mask(flag: bool) -> Self {
        if flag {
            Self::all_ones()
        } else {
            Self::zero()
        }
    }
    fn sign_bit(self) -> bool;
}

macro_rules! impl_simd_scalar {
    ($scalar:ty, $bits:ty) => {
        impl SimdScalar for $scalar {
            const BYTES: usize = std::mem::size_of::<$scalar>();

            #[inline(always)]
            fn all_ones() -> Self {
                <$scalar>::from_bits(<$bits>::MAX)
            }
            #[inline(always)]
            fn bit_and(self, rhs: Self) -> Self {
                <$scalar>::from_bits(self.to_bits() & rhs.to_bits())
            }
            #[inline(always)]
            fn bit_or(self, rhs: Self) -> Self {
                <$scalar>::from_bits(self.to_bits() | rhs.to_bits())
            }
            #[inline(always)]
            fn bit_xor(self, rhs: Self) -> Self {
                <$scalar>::from_bits(self.to_bits() ^ rhs.to_bits())
            }
            #[inline(always)]
            fn bit_not(self) -> Self {
                <$scalar>::from_bits(!self.to_bits())
            }
            #[inline(always)]
            fn sign_bit(self) -> bool {
                self.to_bits() >> (<$bits>::BITS - 1) == 1
            }
        }
    };
}

impl_simd_scalar!(f32, u32);
impl_simd_scalar!(f64, u64);

/// A vector of [`SimdVec::LANES`] scalars with value semantics.
///
/// # Lane order
///
/// Lane `i` is the `i`-th scalar in memory order: `load`/`store` map lane 0
/// to the lowest address, [`first`](SimdVec::first) returns lane 0, and bit
/// `i` of [`signbits`](SimdVec::signbits) and of a [`blend`](crate::simd::blend)
/// immediate refer to lane `i`.
///
/// # Masks
///
/// The `mask_*` comparisons return vectors whose lanes are all-ones where the
/// predicate holds and all-zeros elsewhere. Masks are meant for the bitwise
/// operators, [`blendv`](SimdVec::blendv) and [`signbits`](SimdVec::signbits);
/// arithmetic on them is meaningless.
///
/// # Safety of the raw-pointer API
///
/// Memory transfers take raw pointers and perform no checks in release
/// builds. Debug builds assert alignment and non-null pointers.
pub trait SimdVec:
    Copy
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Neg<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    type Scalar: SimdScalar;

    /// Number of lanes.
    const LANES: usize;

    /// Alignment in bytes required by [`load`](SimdVec::load) and [`store`](SimdVec::store).
    const ALIGN: usize;

    /// Number of lanes, as a function for generic code.
    #[inline(always)]
    fn lanes() -> usize {
        Self::LANES
    }

    /// Broadcasts `value` to every lane.
    fn splat(value: Self::Scalar) -> Self;

    #[inline(always)]
    fn zero() -> Self {
        Self::splat(<Self::Scalar as num::Zero>::zero())
    }

    /// All lanes all-bits-0.
    fn zeromask() -> Self;

    /// All lanes all-bits-1.
    fn onemask() -> Self;

    /// Loads `LANES` scalars from `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be aligned to [`Self::ALIGN`](SimdVec::ALIGN) bytes and
    /// valid for `LANES` reads.
    unsafe fn load(ptr: *const Self::Scalar) -> Self;

    /// Loads `LANES` scalars from `ptr` without alignment requirement.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for `LANES` reads.
    unsafe fn loadu(ptr: *const Self::Scalar) -> Self;

    /// Stores every lane to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be aligned to [`Self::ALIGN`](SimdVec::ALIGN) bytes and
    /// valid for `LANES` writes.
    unsafe fn store(self, ptr: *mut Self::Scalar);

    /// Stores every lane to `ptr` without alignment requirement.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for `LANES` writes.
    unsafe fn storeu(self, ptr: *mut Self::Scalar);

    /// Loads the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `LANES`.
    #[inline(always)]
    fn from_slice(slice: &[Self::Scalar]) -> Self {
        assert!(
            slice.len() >= Self::LANES,
            "slice of length {} is too short for {} lanes",
            slice.len(),
            Self::LANES
        );
        // SAFETY: the slice holds at least LANES elements.
        unsafe { Self::loadu(slice.as_ptr()) }
    }

    /// Writes every lane to the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `LANES`.
    #[inline(always)]
    fn write_to_slice(self, slice: &mut [Self::Scalar]) {
        assert!(
            slice.len() >= Self::LANES,
            "slice of length {} is too short for {} lanes",
            slice.len(),
            Self::LANES
        );
        // SAFETY: the slice holds at least LANES elements.
        unsafe { self.storeu(slice.as_mut_ptr()) }
    }

    fn to_vec(self) -> Vec<Self::Scalar> {
        let mut out = vec![<Self::Scalar as num::Zero>::zero(); Self::LANES];
        self.write_to_slice(&mut out);
        out
    }

    /// Lane 0.
    fn first(self) -> Self::Scalar;

    /// `!self & rhs`.
    fn andnot(self, rhs: Self) -> Self;

    fn mask_eq(self, rhs: Self) -> Self;
    /// Unordered: NaN lanes compare not-equal.
    fn mask_neq(self, rhs: Self) -> Self;
    fn mask_lt(self, rhs: Self) -> Self;
    fn mask_le(self, rhs: Self) -> Self;
    fn mask_gt(self, rhs: Self) -> Self;
    fn mask_ge(self, rhs: Self) -> Self;

    /// Packs the sign bit of every lane into an integer, bit `i` for lane `i`.
    fn signbits(self) -> u64;

    /// Horizontal sum of all lanes.
    ///
    /// The summation order is fixed for a given tier but differs between
    /// tiers; compare results across tiers with a tolerance.
    fn sum(self) -> Self::Scalar;

    /// Folds the lanes in lane order.
    fn fold_lanes<F>(self, init: Self::Scalar, f: F) -> Self::Scalar
    where
        F: FnMut(Self::Scalar, Self::Scalar) -> Self::Scalar;

    /// Applies `f` to every lane.
    fn map_lanes<F>(self, f: F) -> Self
    where
        F: FnMut(Self::Scalar) -> Self::Scalar;

    /// Applies `f` to every pair of lanes of `self` and `other`.
    fn zip_lanes<F>(self, other: Self, f: F) -> Self
    where
        F: FnMut(Self::Scalar, Self::Scalar) -> Self::Scalar;

    /// Clears the sign bit of every lane.
    fn abs(self) -> Self;

    /// Magnitude of `self` with the sign bit of `sign`.
    fn copysign(self, sign: Self) -> Self;

    /// Lane-wise minimum with the hardware's NaN behaviour.
    fn min(self, rhs: Self) -> Self;

    /// Lane-wise maximum with the hardware's NaN behaviour.
    fn max(self, rhs: Self) -> Self;

    fn sqrt(self) -> Self;

    /// `self * b + c`, fused (single rounding) when the tier has FMA.
    fn fmuladd(self, b: Self, c: Self) -> Self;

    /// `self * b - c`, fused (single rounding) when the tier has FMA.
    fn fmulsub(self, b: Self, c: Self) -> Self;

    /// Per-lane choice: `other` where `mask` is all-ones, `self` where it is all-zeros.
    fn blendv(self, other: Self, mask: Self) -> Self;

    /// Per-lane choice by immediate: bit `i` set takes lane `i` from `other`.
    ///
    /// Prefer [`blend`](crate::simd::blend), which takes the immediate as a
    /// const generic; this form exists so compositions can slice it.
    fn blend_imm(self, other: Self, imm: u64) -> Self;

    /// Reads `x[stride * i]` into lane `i`.
    ///
    /// # Safety
    ///
    /// `stride >= 1` and `x` must be valid for reads at every
    /// `x[stride * i]`, `i < LANES`. No alignment is required.
    unsafe fn gather(stride: usize, x: *const Self::Scalar) -> Self;

    /// Writes lane `i` to `x[stride * i]`; other elements are untouched.
    ///
    /// # Safety
    ///
    /// `stride >= 1` and `x` must be valid for writes at every
    /// `x[stride * i]`, `i < LANES`.
    unsafe fn scatter(self, stride: usize, x: *mut Self::Scalar);

    /// Transposes `LANES` rows of `stride` interleaved fields into `stride` vectors.
    ///
    /// `out[col]` lane `row` receives `x[row * stride + col]`, which turns
    /// `LANES` instances of a `stride`-field struct into one vector per field.
    ///
    /// # Safety
    ///
    /// `x` must be valid for `stride * LANES` reads and `out.len()` must be `stride`.
    #[inline(always)]
    unsafe fn pack(stride: usize, x: *const Self::Scalar, out: &mut [Self]) {
        debug_assert_eq!(out.len(), stride, "pack needs one output vector per field");
        for (col, field) in out.iter_mut().enumerate() {
            *field = Self::gather(stride, x.add(col));
        }
    }

    /// Inverse of [`pack`](SimdVec::pack).
    ///
    /// # Safety
    ///
    /// `x` must be valid for `stride * LANES` writes and `input.len()` must be `stride`.
    #[inline(always)]
    unsafe fn unpack(input: &[Self], stride: usize, x: *mut Self::Scalar) {
        debug_assert_eq!(input.len(), stride, "unpack needs one input vector per field");
        for (col, field) in input.iter().enumerate() {
            field.scatter(stride, x.add(col));
        }
    }

    /// Safe form of [`gather`](SimdVec::gather).
    ///
    /// # Panics
    ///
    /// Panics if `stride == 0` or `x` is shorter than `stride * (LANES - 1) + 1`.
    fn gather_slice(stride: usize, x: &[Self::Scalar]) -> Self {
        assert!(stride >= 1, "stride must be at least 1");
        assert!(
            x.len() > stride * (Self::LANES - 1),
            "slice of length {} is too short for stride {} over {} lanes",
            x.len(),
            stride,
            Self::LANES
        );
        // SAFETY: every strided index is in bounds.
        unsafe { Self::gather(stride, x.as_ptr()) }
    }

    /// Safe form of [`scatter`](SimdVec::scatter).
    ///
    /// # Panics
    ///
    /// Panics if `stride == 0` or `x` is shorter than `stride * (LANES - 1) + 1`.
    fn scatter_slice(self, stride: usize, x: &mut [Self::Scalar]) {
        assert!(stride >= 1, "stride must be at least 1");
        assert!(
            x.len() > stride * (Self::LANES - 1),
            "slice of length {} is too short for stride {} over {} lanes",
            x.len(),
            stride,
            Self::LANES
        );
        // SAFETY: every strided index is in bounds.
        unsafe { self.scatter(stride, x.as_mut_ptr()) }
    }
}

/// A single hardware register (or its portable stand-in).
///
/// Native vectors expose their lanes as a plain array, which is what the
/// strided reference algorithms in [`strided`](crate::simd::strided) build on.
pub trait SimdBase: SimdVec {
    /// `[Scalar; LANES]`.
    type Array: Copy + Default + AsRef<[Self::Scalar]> + AsMut<[Self::Scalar]>;

    /// Builds a vector from lanes in lane order.
    fn from_array(lanes: Self::Array) -> Self;

    fn to_array(self) -> Self::Array;
}

/// Branch-free per-lane choice, defined for every vector type and for scalars.
pub trait Select: Copy {
    /// Vector mask for vectors, `bool` for scalars.
    type Mask;

    fn select(a: Self, b: Self, mask: Self::Mask) -> Self;
}

impl Select for f32 {
    type Mask = bool;

    #[inline(always)]
    fn select(a: f32, b: f32, mask: bool) -> f32 {
        if mask {
            b
        } else {
            a
        }
    }
}

impl Select for f64 {
    type Mask = bool;

    #[inline(always)]
    fn select(a: f64, b: f64, mask: bool) -> f64 {
        if mask {
            b
        } else {
            a
        }
    }
}
