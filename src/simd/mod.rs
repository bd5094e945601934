//! Lane vectors for `f32` and `f64`.
//!
//! The building blocks, from the hardware up:
//!
//! - [`sse`] and [`avx`]: native 128-bit and 256-bit register wrappers,
//!   compiled only when the build tier provides them;
//! - [`portable`]: array-backed stand-ins for the 128-bit types, used as the
//!   native vectors on the `scalar` tier;
//! - [`Emulated`]: wider logical vectors composed from narrower ones;
//! - [`width`]: the `float4` .. `double16` aliases that pick native or
//!   emulated types for the compiled tier, plus [`select`] and [`blend`];
//! - [`SimdMath`]: elementary functions on every width.
//!
//! Every vector implements [`SimdVec`], so algorithms written against the
//! trait (or against the width aliases) compile unchanged on every tier.
//!
//! # Tier selection
//!
//! `build.rs` inspects the target features the crate is compiled with and
//! enables the cumulative cfg flags `sse2`, `sse3`, `sse41`, `sse42`, `avx`
//! and `avx2` (or `fallback` when none applies). Compile with e.g.
//! `RUSTFLAGS="-C target-cpu=native"` to use the widest registers of the
//! build machine, and set `SIMDTYPE_MAX_TIER` to cap the tier.

#[macro_use]
mod macros;

pub mod emulated;
pub mod math;
pub mod portable;
pub mod strided;
pub mod traits;
pub mod width;

#[cfg(sse2)]
pub mod sse;

#[cfg(avx)]
pub mod avx;

pub use emulated::Emulated;
pub use math::SimdMath;
pub use traits::{Select, SimdBase, SimdScalar, SimdVec};
pub use width::{
    blend, double16, double2, double4, double8, float16, float4, float8, select,
};
