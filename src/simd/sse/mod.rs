//! 128-bit SSE lane vectors.
//!
//! This module is compiled when the build tier is `sse2` or higher. Each type
//! wraps one XMM register and picks the best instruction available at the
//! compiled tier:
//!
//! - horizontal sums use `haddps`/`haddpd` from SSE3 and shuffles otherwise,
//! - `blendv` uses `blendvps`/`blendvpd` from SSE4.1 and and/andnot/or otherwise,
//! - `fmuladd`/`fmulsub` are fused on the `avx2` tier (which requires FMA).
//!
//! # Available Types
//!
//! - [`F32x4`](f32x4::F32x4): four packed `f32`, the native `float4`
//! - [`F64x2`](f64x2::F64x2): two packed `f64`, the native `double2`

pub mod f32x4;
pub mod f64x2;

pub use f32x4::F32x4;
pub use f64x2::F64x2;
