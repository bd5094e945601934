//! `ArrayOps` for `f32` and `f64`.
//!
//! The kernels are generic over the vector type and instantiated with
//! `float16` for `f32` and `double8` for `f64`. Each one walks
//! `chunks_exact(V::LANES)` and handles the remainder with the equivalent
//! scalar expression.

use num::{Float, Zero};

use super::ArrayOps;
use crate::simd::{double8, float16, SimdVec};

#[inline(always)]
fn fill<V: SimdVec>(x: &mut [V::Scalar], value: V::Scalar) {
    let v = V::splat(value);
    let mut chunks = x.chunks_exact_mut(V::LANES);
    for chunk in &mut chunks {
        v.write_to_slice(chunk);
    }
    for xi in chunks.into_remainder() {
        *xi = value;
    }
}

#[inline(always)]
fn scale<V: SimdVec>(x: &mut [V::Scalar], a: V::Scalar) {
    let va = V::splat(a);
    let mut chunks = x.chunks_exact_mut(V::LANES);
    for chunk in &mut chunks {
        (V::from_slice(chunk) * va).write_to_slice(chunk);
    }
    for xi in chunks.into_remainder() {
        *xi = *xi * a;
    }
}

/// Lane-parallel accumulation of `x[i] * y[i]`, shared by `dot` and `sqsum`.
#[inline(always)]
fn dot<V: SimdVec>(x: &[V::Scalar], y: &[V::Scalar]) -> V::Scalar {
    assert_eq!(x.len(), y.len(), "dot: x and y must have the same length");

    let mut acc = V::zero();
    let xs = x.chunks_exact(V::LANES);
    let ys = y.chunks_exact(V::LANES);
    let (x_tail, y_tail) = (xs.remainder(), ys.remainder());
    for (xc, yc) in xs.zip(ys) {
        acc = V::from_slice(xc).fmuladd(V::from_slice(yc), acc);
    }

    x_tail
        .iter()
        .zip(y_tail)
        .fold(acc.sum(), |sum, (&xi, &yi)| sum + xi * yi)
}

#[inline(always)]
fn maxabs<V: SimdVec>(x: &[V::Scalar]) -> V::Scalar {
    let mut acc = V::zero();
    let chunks = x.chunks_exact(V::LANES);
    let tail = chunks.remainder();
    for chunk in chunks {
        acc = acc.max(V::from_slice(chunk).abs());
    }

    let head = acc.fold_lanes(<V::Scalar as Zero>::zero(), Float::max);
    tail.iter().fold(head, |m, &xi| m.max(xi.abs()))
}

#[inline(always)]
fn minabs<V: SimdVec>(x: &[V::Scalar]) -> V::Scalar {
    let largest = <V::Scalar as Float>::max_value();
    let mut acc = V::splat(largest);
    let chunks = x.chunks_exact(V::LANES);
    let tail = chunks.remainder();
    for chunk in chunks {
        acc = acc.min(V::from_slice(chunk).abs());
    }

    let head = acc.fold_lanes(largest, Float::min);
    tail.iter().fold(head, |m, &xi| m.min(xi.abs()))
}

#[inline(always)]
fn axpy<V: SimdVec>(a: V::Scalar, x: &[V::Scalar], b: V::Scalar, y: &mut [V::Scalar]) {
    assert_eq!(x.len(), y.len(), "axpy: x and y must have the same length");

    let (va, vb) = (V::splat(a), V::splat(b));
    let mut ys = y.chunks_exact_mut(V::LANES);
    let xs = x.chunks_exact(V::LANES);
    let x_tail = xs.remainder();
    for (yc, xc) in (&mut ys).zip(xs) {
        let by = V::from_slice(yc) * vb;
        V::from_slice(xc).fmuladd(va, by).write_to_slice(yc);
    }
    for (yi, &xi) in ys.into_remainder().iter_mut().zip(x_tail) {
        *yi = a * xi + b * *yi;
    }
}

#[inline(always)]
#[allow(clippy::too_many_arguments)]
fn axpy3<V: SimdVec>(
    a: V::Scalar,
    x: &[V::Scalar],
    b: V::Scalar,
    y: &[V::Scalar],
    c: V::Scalar,
    z: &mut [V::Scalar],
) {
    assert_eq!(x.len(), z.len(), "axpy3: x and z must have the same length");
    assert_eq!(y.len(), z.len(), "axpy3: y and z must have the same length");

    let (va, vb, vc) = (V::splat(a), V::splat(b), V::splat(c));
    let mut zs = z.chunks_exact_mut(V::LANES);
    let xs = x.chunks_exact(V::LANES);
    let ys = y.chunks_exact(V::LANES);
    let (x_tail, y_tail) = (xs.remainder(), ys.remainder());
    for ((zc, xc), yc) in (&mut zs).zip(xs).zip(ys) {
        let cz = V::from_slice(zc) * vc;
        let byz = V::from_slice(yc).fmuladd(vb, cz);
        V::from_slice(xc).fmuladd(va, byz).write_to_slice(zc);
    }
    for ((zi, &xi), &yi) in zs.into_remainder().iter_mut().zip(x_tail).zip(y_tail) {
        *zi = a * xi + b * yi + c * *zi;
    }
}

#[inline(always)]
fn hprod<V: SimdVec>(x: &[V::Scalar], y: &[V::Scalar], z: &mut [V::Scalar]) {
    assert_eq!(x.len(), z.len(), "hprod: x and z must have the same length");
    assert_eq!(y.len(), z.len(), "hprod: y and z must have the same length");

    let mut zs = z.chunks_exact_mut(V::LANES);
    let xs = x.chunks_exact(V::LANES);
    let ys = y.chunks_exact(V::LANES);
    let (x_tail, y_tail) = (xs.remainder(), ys.remainder());
    for ((zc, xc), yc) in (&mut zs).zip(xs).zip(ys) {
        (V::from_slice(xc) * V::from_slice(yc)).write_to_slice(zc);
    }
    for ((zi, &xi), &yi) in zs.into_remainder().iter_mut().zip(x_tail).zip(y_tail) {
        *zi = xi * yi;
    }
}

macro_rules! impl_real_ops {
    ($scalar:ty, $vector:ty) => {
        impl ArrayOps for $scalar {
            type Real = $scalar;

            fn fill(x: &mut [$scalar], value: $scalar) {
                fill::<$vector>(x, value)
            }

            fn scale(x: &mut [$scalar], a: $scalar) {
                scale::<$vector>(x, a)
            }

            fn sqsum(x: &[$scalar]) -> $scalar {
                dot::<$vector>(x, x)
            }

            fn maxabs(x: &[$scalar]) -> $scalar {
                maxabs::<$vector>(x)
            }

            fn minabs(x: &[$scalar]) -> $scalar {
                minabs::<$vector>(x)
            }

            fn dot(x: &[$scalar], y: &[$scalar]) -> $scalar {
                dot::<$vector>(x, y)
            }

            fn axpy(a: $scalar, x: &[$scalar], b: $scalar, y: &mut [$scalar]) {
                axpy::<$vector>(a, x, b, y)
            }

            fn axpy3(
                a: $scalar,
                x: &[$scalar],
                b: $scalar,
                y: &[$scalar],
                c: $scalar,
                z: &mut [$scalar],
            ) {
                axpy3::<$vector>(a, x, b, y, c, z)
            }

            fn hprod(x: &[$scalar], y: &[$scalar], z: &mut [$scalar]) {
                hprod::<$vector>(x, y, z)
            }
        }
    };
}

impl_real_ops!(f32, float16);
impl_real_ops!(f64, double8);
