//! `ArrayOps` for `Complex<f32>` and `Complex<f64>`.

use num::{Complex, Float};

use super::ArrayOps;

/// Reinterprets complex elements as `[re, im, re, im, ...]`.
#[inline(always)]
fn interleaved<T>(x: &[Complex<T>]) -> &[T] {
    // SAFETY: `Complex<T>` is `#[repr(C)]` with fields `re` then `im`, so a
    // slice of `n` complex numbers is `2n` contiguous `T` with the same
    // alignment as `T`.
    unsafe { std::slice::from_raw_parts(x.as_ptr() as *const T, x.len() * 2) }
}

impl<T> ArrayOps for Complex<T>
where
    T: ArrayOps<Real = T> + Float,
{
    type Real = T;

    fn fill(x: &mut [Self], value: Self) {
        x.iter_mut().for_each(|xi| *xi = value);
    }

    fn scale(x: &mut [Self], a: Self) {
        x.iter_mut().for_each(|xi| *xi = *xi * a);
    }

    /// `Σ |x[i]|²`, computed by the real kernel over both components.
    fn sqsum(x: &[Self]) -> Self {
        Complex::new(T::sqsum(interleaved(x)), T::zero())
    }

    fn maxabs(x: &[Self]) -> T {
        x.iter().fold(T::zero(), |m, xi| m.max(xi.norm()))
    }

    fn minabs(x: &[Self]) -> T {
        x.iter().fold(T::max_value(), |m, xi| m.min(xi.norm()))
    }

    fn dot(x: &[Self], y: &[Self]) -> Self {
        assert_eq!(x.len(), y.len(), "dot: x and y must have the same length");
        x.iter()
            .zip(y)
            .fold(Self::new(T::zero(), T::zero()), |acc, (xi, yi)| acc + xi.conj() * yi)
    }

    fn axpy(a: Self, x: &[Self], b: Self, y: &mut [Self]) {
        assert_eq!(x.len(), y.len(), "axpy: x and y must have the same length");
        for (yi, xi) in y.iter_mut().zip(x) {
            *yi = a * xi + b * *yi;
        }
    }

    fn axpy3(a: Self, x: &[Self], b: Self, y: &[Self], c: Self, z: &mut [Self]) {
        assert_eq!(x.len(), z.len(), "axpy3: x and z must have the same length");
        assert_eq!(y.len(), z.len(), "axpy3: y and z must have the same length");
        for ((zi, xi), yi) in z.iter_mut().zip(x).zip(y) {
            *zi = a * xi + b * yi + c * *zi;
        }
    }

    fn hprod(x: &[Self], y: &[Self], z: &mut [Self]) {
        assert_eq!(x.len(), z.len(), "hprod: x and z must have the same length");
        assert_eq!(y.len(), z.len(), "hprod: y and z must have the same length");
        for ((zi, xi), yi) in z.iter_mut().zip(x).zip(y) {
            *zi = xi * yi;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type C32 = Complex<f32>;
    type C64 = Complex<f64>;

    fn spiral(len: usize) -> Vec<C64> {
        (0..len)
            .map(|i| C64::new(i as f64 * 0.5 - 3.0, 1.0 - i as f64 * 0.25))
            .collect()
    }

    #[test]
    fn test_interleaved_view() {
        let x = [C32::new(1.0, 2.0), C32::new(3.0, 4.0)];
        assert_eq!(interleaved(&x), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sqsum_is_real() {
        let x = [C64::new(3.0, 4.0), C64::new(0.0, 1.0)];
        assert_eq!(<C64 as ArrayOps>::sqsum(&x), C64::new(26.0, 0.0));
        assert_eq!(<C64 as ArrayOps>::sqsum(&[]), C64::new(0.0, 0.0));
    }

    #[test]
    fn test_sqsum_matches_norm_sqr_across_chunk_boundary() {
        let x = spiral(21);
        let expected: f64 = x.iter().map(|z| z.norm_sqr()).sum();
        let got = <C64 as ArrayOps>::sqsum(&x);
        assert!((got.re - expected).abs() < 1e-10);
        assert_eq!(got.im, 0.0);
    }

    #[test]
    fn test_dot_conjugates_first_argument() {
        let x = [C64::new(0.0, 1.0)];
        let y = [C64::new(0.0, 1.0)];
        // conj(i) * i = 1
        assert_eq!(<C64 as ArrayOps>::dot(&x, &y), C64::new(1.0, 0.0));

        let x = spiral(9);
        let self_dot = <C64 as ArrayOps>::dot(&x, &x);
        let sqsum = <C64 as ArrayOps>::sqsum(&x);
        assert!((self_dot.re - sqsum.re).abs() < 1e-10);
        assert_eq!(self_dot.im, 0.0);
    }

    #[test]
    fn test_maxabs_minabs() {
        let x = [C32::new(3.0, 4.0), C32::new(0.0, -1.0), C32::new(-6.0, 8.0)];
        assert_eq!(<C32 as ArrayOps>::maxabs(&x), 10.0);
        assert_eq!(<C32 as ArrayOps>::minabs(&x), 1.0);
        assert_eq!(<C32 as ArrayOps>::maxabs(&[]), 0.0);
        assert_eq!(<C32 as ArrayOps>::minabs(&[]), f32::MAX);
    }

    #[test]
    fn test_fill_scale() {
        let mut x = vec![C64::new(0.0, 0.0); 5];
        <C64 as ArrayOps>::fill(&mut x, C64::new(1.0, 1.0));
        <C64 as ArrayOps>::scale(&mut x, C64::new(0.0, 1.0));
        assert!(x.iter().all(|z| *z == C64::new(-1.0, 1.0)));
    }

    #[test]
    fn test_axpy_axpy3_hprod() {
        let i = C64::new(0.0, 1.0);
        let one = C64::new(1.0, 0.0);
        let x = vec![one; 3];
        let mut y = vec![i; 3];

        <C64 as ArrayOps>::axpy(i, &x, one, &mut y);
        assert!(y.iter().all(|z| *z == C64::new(0.0, 2.0)));

        let mut z = vec![one; 3];
        <C64 as ArrayOps>::axpy3(one, &x, i, &y, one, &mut z);
        // 1 + i * 2i + 1 = 0
        assert!(z.iter().all(|v| *v == C64::new(0.0, 0.0)));

        let mut w = vec![C64::new(0.0, 0.0); 3];
        <C64 as ArrayOps>::hprod(&y, &y, &mut w);
        assert!(w.iter().all(|v| *v == C64::new(-4.0, 0.0)));
    }
}
