//! SIMD capability tiers.
//!
//! The tier a build uses is decided once, by `build.rs`, from the target
//! features rustc enables (optionally capped through `SIMDTYPE_MAX_TIER`).
//! Which vector aliases are native and which are emulated follows from it.
//!
//! [`Tier::detect`] inspects the CPU the process is running on. It never changes
//! the code path that executes; it only lets callers verify that the compiled
//! tier is safe to run, see [`check_runtime_support`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SimdError};

/// A level of x86 SIMD capability, each a superset of the previous one.
///
/// `Scalar` stands for targets without any x86 vector unit; the portable
/// array-backed lane types are used there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Scalar,
    Sse2,
    Sse3,
    Sse41,
    Sse42,
    Avx,
    /// AVX2 together with FMA.
    Avx2,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 7] = [
        Tier::Scalar,
        Tier::Sse2,
        Tier::Sse3,
        Tier::Sse41,
        Tier::Sse42,
        Tier::Avx,
        Tier::Avx2,
    ];

    /// The tier this crate was compiled for.
    pub const fn compiled() -> Tier {
        if cfg!(avx2) {
            Tier::Avx2
        } else if cfg!(avx) {
            Tier::Avx
        } else if cfg!(sse42) {
            Tier::Sse42
        } else if cfg!(sse41) {
            Tier::Sse41
        } else if cfg!(sse3) {
            Tier::Sse3
        } else if cfg!(sse2) {
            Tier::Sse2
        } else {
            Tier::Scalar
        }
    }

    /// Highest tier supported by the running CPU.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub fn detect() -> Tier {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            Tier::Avx2
        } else if is_x86_feature_detected!("avx") {
            Tier::Avx
        } else if is_x86_feature_detected!("sse4.2") {
            Tier::Sse42
        } else if is_x86_feature_detected!("sse4.1") && is_x86_feature_detected!("ssse3") {
            Tier::Sse41
        } else if is_x86_feature_detected!("sse3") {
            Tier::Sse3
        } else if is_x86_feature_detected!("sse2") {
            Tier::Sse2
        } else {
            Tier::Scalar
        }
    }

    /// Highest tier supported by the running CPU.
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    pub fn detect() -> Tier {
        Tier::Scalar
    }

    /// Width in bytes of the widest native register at this tier.
    pub const fn register_bytes(self) -> usize {
        match self {
            Tier::Scalar | Tier::Sse2 | Tier::Sse3 | Tier::Sse41 | Tier::Sse42 => 16,
            Tier::Avx | Tier::Avx2 => 32,
        }
    }

    /// Whether `fmuladd`/`fmulsub` use a single-rounding fused instruction.
    pub const fn has_fma(self) -> bool {
        matches!(self, Tier::Avx2)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tier::Scalar => "scalar",
            Tier::Sse2 => "sse2",
            Tier::Sse3 => "sse3",
            Tier::Sse41 => "sse41",
            Tier::Sse42 => "sse42",
            Tier::Avx => "avx",
            Tier::Avx2 => "avx2",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = SimdError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Tier::ALL
            .iter()
            .copied()
            .find(|tier| tier.name() == wanted)
            .ok_or_else(|| SimdError::UnknownTier {
                name: s.trim().to_string(),
            })
    }
}

/// Verifies that the running CPU supports the compiled tier.
///
/// Returns the compiled tier on success. Call it once at start-up, before any
/// vector operation runs, when the binary may be shipped to other machines.
pub fn check_runtime_support() -> Result<Tier> {
    let compiled = Tier::compiled();
    let detected = Tier::detect();

    log::debug!("simd tier: compiled={compiled}, detected={detected}");

    if compiled > detected {
        log::warn!(
            "running CPU supports {detected} but vector code was compiled for {compiled}"
        );
        return Err(SimdError::UnsupportedTier { compiled, detected });
    }

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_tier_matches_build_script() {
        assert_eq!(Tier::compiled().name(), env!("SIMDTYPE_TIER"));
    }

    #[test]
    fn test_tiers_are_ordered() {
        for pair in Tier::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(tier.name().parse::<Tier>().unwrap(), tier);
        }
        assert_eq!(" AVX2 ".parse::<Tier>().unwrap(), Tier::Avx2);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "mmx".parse::<Tier>().unwrap_err();
        assert!(matches!(err, SimdError::UnknownTier { .. }));
    }

    #[test]
    fn test_register_bytes() {
        assert_eq!(Tier::Sse2.register_bytes(), 16);
        assert_eq!(Tier::Avx.register_bytes(), 32);
        assert!(Tier::Avx2.has_fma());
        assert!(!Tier::Avx.has_fma());
    }

    #[test_log::test]
    fn test_running_cpu_supports_compiled_tier() {
        // The test binary is running, so the compiled tier must be executable here.
        assert_eq!(check_runtime_support().unwrap(), Tier::compiled());
        assert!(Tier::detect() >= Tier::compiled());
    }
}
