//! Width-polymorphic SIMD vectors for `f32` and `f64`.
//!
//! `simdtype` lets numeric code be written once against a logical vector
//! width and compiled for whatever x86 SIMD tier the build targets:
//!
//! - native lane vectors wrap one SSE or AVX register
//!   ([`simd::sse`], [`simd::avx`]), with an array-backed stand-in for
//!   targets without one ([`simd::portable`]);
//! - [`simd::Emulated`] composes narrower vectors into wider ones;
//! - [`simd::width`] maps `float4`, `float8`, `float16`, `double2`,
//!   `double4`, `double8` and `double16` to native or emulated types;
//! - [`ops::ArrayOps`] provides vectorised kernels over slices of `f32`,
//!   `f64` and their complex counterparts.
//!
//! # Example
//!
//! ```rust
//! use simdtype::simd::{double2, float4, SimdVec};
//!
//! let a = float4::new(1.0, 2.0, 3.0, 4.0);
//! let b = float4::new(4.0, 3.0, 2.0, 1.0);
//! assert_eq!((a + b).sum(), 20.0);
//!
//! let x = double2::splat(3.0);
//! let y = double2::splat(4.0);
//! assert_eq!((x * x + y * y).sqrt().first(), 5.0);
//! ```
//!
//! # Build configuration
//!
//! The tier is chosen at compile time from the enabled target features, see
//! [`cpu`]. Build with `RUSTFLAGS="-C target-cpu=native"` for the widest
//! registers of the build machine, and call [`cpu::check_runtime_support`]
//! when the binary may run elsewhere.

pub mod cpu;
pub mod error;
pub mod ops;
pub mod simd;
pub mod utils;

/// Default alignment of [`utils::AlignedBuf`], enough for aligned access by
/// every vector width.
pub const DEFAULT_ALIGNMENT: usize = 32;

/// Arrays up to this length run the sequential kernel in the `par_*` variants
/// of [`ops::ArrayOps`].
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Elements per rayon task. A multiple of every vector width, so chunk
/// boundaries never split a vector.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;

const _: () = assert!(PARALLEL_CHUNK_SIZE % 64 == 0);
