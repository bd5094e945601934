//! Strided transfers between plain scalar arrays and native lane vectors.
//!
//! These are the reference implementations behind `gather`, `scatter`,
//! `pack` and `unpack` on every native vector: lanes are copied through a
//! small 32-byte aligned scratch array and moved in or out of the register
//! with a single aligned load or store. The copy loops have a constant trip
//! count, so the compiler lowers them to register moves.
//!
//! Emulated vectors never call these directly; they split the work across
//! their constituent native vectors.

use crate::simd::traits::SimdBase;

/// Scratch space aligned for the widest supported register.
#[repr(C, align(32))]
#[derive(Default)]
struct Scratch<A>(A);

#[inline(always)]
const fn assert_fits_register<V: SimdBase>() {
    assert!(
        V::LANES * std::mem::size_of::<V::Scalar>() <= 32,
        "strided transfers are limited to 256-bit registers"
    );
}

/// Reads `x[stride * i]` into lane `i` of a fresh vector.
///
/// # Safety
///
/// `stride >= 1` and `x` must be valid for reads at `x[stride * i]` for
/// every `i < V::LANES`.
#[inline(always)]
pub unsafe fn gather<V: SimdBase>(stride: usize, x: *const V::Scalar) -> V {
    const { assert_fits_register::<V>() };
    debug_assert!(stride >= 1, "stride must be at least 1");

    let mut tmp = Scratch::<V::Array>::default();
    for (i, lane) in tmp.0.as_mut().iter_mut().enumerate() {
        *lane = *x.add(stride * i);
    }
    V::load(tmp.0.as_ref().as_ptr())
}

/// Writes lane `i` of `v` to `x[stride * i]`.
///
/// # Safety
///
/// `stride >= 1` and `x` must be valid for writes at `x[stride * i]` for
/// every `i < V::LANES`.
#[inline(always)]
pub unsafe fn scatter<V: SimdBase>(v: V, stride: usize, x: *mut V::Scalar) {
    const { assert_fits_register::<V>() };
    debug_assert!(stride >= 1, "stride must be at least 1");

    let mut tmp = Scratch::<V::Array>::default();
    v.store(tmp.0.as_mut().as_mut_ptr());
    for (i, lane) in tmp.0.as_ref().iter().enumerate() {
        *x.add(stride * i) = *lane;
    }
}

/// Loads `stride` interleaved columns of `V::LANES` rows, one vector per column.
///
/// # Safety
///
/// `x` must be valid for `stride * V::LANES` reads and `out.len() == stride`.
#[inline(always)]
pub unsafe fn pack<V: SimdBase>(stride: usize, x: *const V::Scalar, out: &mut [V]) {
    debug_assert_eq!(out.len(), stride, "pack needs one output vector per column");
    for (col, column) in out.iter_mut().enumerate() {
        *column = gather(stride, x.add(col));
    }
}

/// Inverse of [`pack`].
///
/// # Safety
///
/// `x` must be valid for `stride * V::LANES` writes and `input.len() == stride`.
#[inline(always)]
pub unsafe fn unpack<V: SimdBase>(input: &[V], stride: usize, x: *mut V::Scalar) {
    debug_assert_eq!(input.len(), stride, "unpack needs one input vector per column");
    for (col, column) in input.iter().enumerate() {
        scatter(*column, stride, x.add(col));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::{portable, SimdVec};

    #[test]
    fn test_gather_stride_three() {
        let x: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let v: portable::F32x4 = unsafe { gather(3, x.as_ptr()) };
        assert_eq!(v.to_array(), [0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_scatter_leaves_other_elements() {
        let mut y = vec![-1.0f64; 6];
        let v = portable::F64x2::from_array([10.0, 20.0]);
        unsafe { scatter(v, 4, y.as_mut_ptr()) };
        assert_eq!(y, vec![10.0, -1.0, -1.0, -1.0, 20.0, -1.0]);
    }

    #[test]
    fn test_pack_unpack_transpose() {
        // 4 instances of a 3-field struct: (i, 10 + i, 100 + i)
        let x: Vec<f32> = (0..4)
            .flat_map(|i| [i as f32, 10.0 + i as f32, 100.0 + i as f32])
            .collect();
        let mut fields = [portable::F32x4::zero(); 3];
        unsafe { pack(3, x.as_ptr(), &mut fields) };
        assert_eq!(fields[0].to_array(), [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(fields[1].to_array(), [10.0, 11.0, 12.0, 13.0]);
        assert_eq!(fields[2].to_array(), [100.0, 101.0, 102.0, 103.0]);

        let mut back = vec![0.0f32; 12];
        unsafe { unpack(&fields, 3, back.as_mut_ptr()) };
        assert_eq!(back, x);
    }
}
