//! 256-bit AVX lane vectors.
//!
//! Compiled when the build tier is `avx` or higher. On the `avx2` tier the
//! fused multiply-add instructions are used for `fmuladd`/`fmulsub`; plain
//! AVX multiplies and adds separately.
//!
//! # Available Types
//!
//! - [`F32x8`](f32x8::F32x8): eight packed `f32`, the native `float8`
//! - [`F64x4`](f64x4::F64x4): four packed `f64`, the native `double4`
//!
//! On the `avx2` tier `F32x8` also carries in-register polynomial kernels for
//! several [`SimdMath`](crate::simd::SimdMath) functions.

pub mod f32x8;
pub mod f64x4;
mod math;

pub use f32x8::F32x8;
pub use f64x4::F64x4;
