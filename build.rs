use std::cmp::Ordering;
use std::env;

// SIMD tiers this crate can compile for
#[derive(PartialEq, Eq, Debug)]
struct SimdTier {
    name: &'static str,
    cfg_flag: &'static str,
    // every listed target feature must be enabled for the tier to apply
    target_features: &'static [&'static str],
    enabled: bool,
}

impl SimdTier {
    // Define priority order between tiers (Lowest number == Highest Priority)
    fn priority(&self) -> usize {
        match self.name {
            "avx2" => 0,
            "avx" => 1,
            "sse42" => 2,
            "sse41" => 3,
            "sse3" => 4,
            "sse2" => 5,
            _ => usize::MAX, // lowest priority by default
        }
    }

    // Each tier is a superset of the previous one, so the feature lists are cumulative.
    fn tiers() -> Vec<SimdTier> {
        vec![
            SimdTier {
                name: "sse2",
                cfg_flag: "sse2",
                target_features: &["sse", "sse2"],
                enabled: false,
            },
            SimdTier {
                name: "sse3",
                cfg_flag: "sse3",
                target_features: &["sse", "sse2", "sse3"],
                enabled: false,
            },
            SimdTier {
                name: "sse41",
                cfg_flag: "sse41",
                target_features: &["sse", "sse2", "sse3", "ssse3", "sse4.1"],
                enabled: false,
            },
            SimdTier {
                name: "sse42",
                cfg_flag: "sse42",
                target_features: &["sse", "sse2", "sse3", "ssse3", "sse4.1", "sse4.2"],
                enabled: false,
            },
            SimdTier {
                name: "avx",
                cfg_flag: "avx",
                target_features: &["sse", "sse2", "sse3", "ssse3", "sse4.1", "sse4.2", "avx"],
                enabled: false,
            },
            SimdTier {
                name: "avx2",
                cfg_flag: "avx2",
                target_features: &[
                    "sse", "sse2", "sse3", "ssse3", "sse4.1", "sse4.2", "avx", "avx2", "fma",
                ],
                enabled: false,
            },
        ]
    }
}

impl Ord for SimdTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for SimdTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Where the list of enabled target features comes from
trait TargetFeatureSource {
    fn enabled_features(&self) -> Vec<String>;
    fn is_applicable(&self) -> bool;
}

// x86/x86_64: trust what rustc will actually enable for the target, so the
// intrinsics behind each cfg are always inlinable and legal to execute.
struct X86TargetFeatures;
impl TargetFeatureSource for X86TargetFeatures {
    fn enabled_features(&self) -> Vec<String> {
        env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .map(|feature| feature.trim().to_string())
            .filter(|feature| !feature.is_empty())
            .collect()
    }

    fn is_applicable(&self) -> bool {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        arch == "x86" || arch == "x86_64"
    }
}

struct TierSelector;
impl TierSelector {
    fn feature_sources() -> Vec<Box<dyn TargetFeatureSource>> {
        vec![Box::new(X86TargetFeatures)]
    }

    fn detect(tiers: &mut [SimdTier]) {
        for source in Self::feature_sources() {
            if source.is_applicable() {
                let enabled = source.enabled_features();
                for tier in tiers.iter_mut() {
                    tier.enabled = tier
                        .target_features
                        .iter()
                        .all(|wanted| enabled.iter().any(|have| have == wanted));
                }
                break;
            }
        }
    }

    // Honour SIMDTYPE_MAX_TIER so emulated paths can be exercised on wide hardware.
    fn apply_cap(tiers: &mut [SimdTier]) {
        let cap = match env::var("SIMDTYPE_MAX_TIER") {
            Ok(cap) => cap.trim().to_lowercase(),
            Err(_) => return,
        };

        let cap_priority = match cap.as_str() {
            "scalar" | "fallback" | "none" => usize::MAX,
            name => match tiers.iter().find(|tier| tier.name == name) {
                Some(tier) => tier.priority(),
                None => {
                    println!("cargo:warning=unknown SIMDTYPE_MAX_TIER value `{cap}`, ignoring");
                    return;
                }
            },
        };

        for tier in tiers.iter_mut() {
            if tier.priority() < cap_priority {
                tier.enabled = false;
            }
        }
    }

    fn apply(tiers: &mut [SimdTier]) {
        // Sort tiers by priority (highest first)
        tiers.sort();

        let selected = tiers.iter().position(|tier| tier.enabled);

        match selected {
            // Lower tiers are implied by the selected one, emit all of them.
            Some(index) => {
                for tier in &tiers[index..] {
                    println!("cargo:rustc-cfg={}", tier.cfg_flag);
                }
                println!("cargo:rustc-env=SIMDTYPE_TIER={}", tiers[index].name);
            }
            None => {
                println!("cargo:rustc-cfg=fallback");
                println!("cargo:rustc-env=SIMDTYPE_TIER=scalar");
            }
        }

        for tier in tiers.iter() {
            println!("cargo::rustc-check-cfg=cfg({})", tier.cfg_flag);
        }
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SIMDTYPE_MAX_TIER");

    let mut tiers = SimdTier::tiers();

    TierSelector::detect(&mut tiers);
    TierSelector::apply_cap(&mut tiers);
    TierSelector::apply(&mut tiers);
}
