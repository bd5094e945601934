//! Errors reported by simdtype.
//!
//! Lane arithmetic never fails: NaN and infinities travel through the lanes
//! as they would through scalar code. Errors come from three places only:
//!
//! - [`AlignedBuf::try_zeroed`](crate::utils::AlignedBuf::try_zeroed), when
//!   the requested buffer cannot be laid out or the allocator refuses it;
//! - [`check_runtime_support`](crate::cpu::check_runtime_support), when the
//!   running CPU is older than the tier the crate was compiled for;
//! - parsing a [`Tier`] from its name.

use std::fmt;

use crate::cpu::Tier;

/// Everything that can go wrong outside of lane arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimdError {
    /// An aligned buffer of `len` elements at `align` bytes cannot exist.
    InvalidLayout {
        /// Requested element count.
        len: usize,
        /// Requested alignment in bytes.
        align: usize,
        reason: &'static str,
    },
    /// The allocator returned null for a valid buffer layout.
    AllocationFailed {
        /// Size of the refused allocation in bytes.
        bytes: usize,
        align: usize,
    },
    /// The running CPU lacks instructions the crate was compiled to use.
    UnsupportedTier {
        /// Tier baked in at build time.
        compiled: Tier,
        /// Highest tier the running CPU supports.
        detected: Tier,
    },
    /// A tier name other than those in [`Tier::ALL`].
    UnknownTier {
        /// The name as given, trimmed.
        name: String,
    },
}

impl fmt::Display for SimdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdError::InvalidLayout { len, align, reason } => write!(
                f,
                "cannot lay out {len} elements at {align}-byte alignment: {reason}"
            ),
            SimdError::AllocationFailed { bytes, align } => write!(
                f,
                "allocation of {bytes} bytes at {align}-byte alignment failed"
            ),
            SimdError::UnsupportedTier { compiled, detected } => write!(
                f,
                "compiled for the {compiled} tier but the running CPU only supports {detected}"
            ),
            SimdError::UnknownTier { name } => {
                write!(f, "unknown SIMD tier `{name}`, expected one of")?;
                for (i, tier) in Tier::ALL.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{tier}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SimdError {}

/// Result type alias for simdtype operations.
pub type Result<T> = std::result::Result<T, SimdError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AlignedBuf;

    #[test]
    fn test_non_power_of_two_alignment_is_rejected() {
        let err = AlignedBuf::<f32>::try_zeroed(8, 24).unwrap_err();
        assert_eq!(
            err,
            SimdError::InvalidLayout {
                len: 8,
                align: 24,
                reason: "alignment must be a power of two",
            }
        );
        assert_eq!(
            err.to_string(),
            "cannot lay out 8 elements at 24-byte alignment: alignment must be a power of two"
        );
    }

    #[test]
    fn test_oversized_buffer_is_rejected_before_allocating() {
        let err = AlignedBuf::<f64>::try_zeroed(usize::MAX / 4, 32).unwrap_err();
        match err {
            SimdError::InvalidLayout { len, align, .. } => {
                assert_eq!(len, usize::MAX / 4);
                assert_eq!(align, 32);
            }
            other => panic!("expected InvalidLayout, got {other:?}"),
        }
    }

    #[test]
    fn test_allocation_failure_message() {
        let err = SimdError::AllocationFailed { bytes: 4096, align: 32 };
        assert_eq!(err.to_string(), "allocation of 4096 bytes at 32-byte alignment failed");
    }

    #[test]
    fn test_unsupported_tier_names_both_tiers() {
        let err = SimdError::UnsupportedTier {
            compiled: Tier::Avx2,
            detected: Tier::Sse41,
        };
        assert_eq!(
            err.to_string(),
            "compiled for the avx2 tier but the running CPU only supports sse41"
        );
    }

    #[test]
    fn test_unknown_tier_lists_valid_names() {
        let err = " mmx ".parse::<Tier>().unwrap_err();
        assert_eq!(err, SimdError::UnknownTier { name: "mmx".into() });
        assert_eq!(
            err.to_string(),
            "unknown SIMD tier `mmx`, expected one of scalar, sse2, sse3, sse41, sse42, avx, avx2"
        );
    }

    #[test]
    fn test_propagates_through_boxed_errors() {
        fn parse_cap(name: &str) -> std::result::Result<Tier, Box<dyn std::error::Error>> {
            Ok(name.parse::<Tier>()?)
        }

        assert_eq!(parse_cap("sse42").unwrap(), Tier::Sse42);
        let err = parse_cap("neon").unwrap_err();
        assert!(err.source().is_none());
        assert!(err.to_string().contains("`neon`"));
    }
}
