//! Host processor capability probing.
//!
//! Code produced by the JIT is compiled against the instruction set
//! extensions the build targets. Running it on a processor lacking one of
//! them would execute illegal instructions, so the host is checked once
//! before the runtime becomes usable.

use crate::error::FatalEnvironmentError;
use cfg_if::cfg_if;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Instruction set extension the generated code may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuFeature {
    /// x86 SSE2.
    Sse2,
    /// x86 SSE3.
    Sse3,
    /// x86 Supplemental SSE3.
    Ssse3,
    /// x86 SSE4.1.
    #[serde(rename = "sse4.1", alias = "sse41")]
    Sse41,
    /// x86 SSE4.2.
    #[serde(rename = "sse4.2", alias = "sse42")]
    Sse42,
    /// x86 population count.
    Popcnt,
    /// x86 AVX.
    Avx,
    /// x86 AVX2.
    Avx2,
    /// x86 fused multiply-add.
    Fma,
    /// x86 half precision conversions.
    F16c,
    /// x86 bit manipulation instruction set 1.
    Bmi1,
    /// x86 bit manipulation instruction set 2.
    Bmi2,
    /// x86 AVX-512 foundation.
    Avx512f,
    /// x86 AVX-512 vector length extensions.
    Avx512vl,
    /// x86 AVX-512 byte and word instructions.
    Avx512bw,
    /// x86 AVX-512 doubleword and quadword instructions.
    Avx512dq,
    /// x86 AVX-512 conflict detection.
    Avx512cd,
    /// ARM Advanced SIMD.
    Neon,
}

impl CpuFeature {
    /// Every known feature, in declaration order.
    pub const ALL: [CpuFeature; 18] = [
        CpuFeature::Sse2,
        CpuFeature::Sse3,
        CpuFeature::Ssse3,
        CpuFeature::Sse41,
        CpuFeature::Sse42,
        CpuFeature::Popcnt,
        CpuFeature::Avx,
        CpuFeature::Avx2,
        CpuFeature::Fma,
        CpuFeature::F16c,
        CpuFeature::Bmi1,
        CpuFeature::Bmi2,
        CpuFeature::Avx512f,
        CpuFeature::Avx512vl,
        CpuFeature::Avx512bw,
        CpuFeature::Avx512dq,
        CpuFeature::Avx512cd,
        CpuFeature::Neon,
    ];

    /// Name of the feature as used by `target_feature`.
    pub const fn name(&self) -> &'static str {
        match self {
            CpuFeature::Sse2 => "sse2",
            CpuFeature::Sse3 => "sse3",
            CpuFeature::Ssse3 => "ssse3",
            CpuFeature::Sse41 => "sse4.1",
            CpuFeature::Sse42 => "sse4.2",
            CpuFeature::Popcnt => "popcnt",
            CpuFeature::Avx => "avx",
            CpuFeature::Avx2 => "avx2",
            CpuFeature::Fma => "fma",
            CpuFeature::F16c => "f16c",
            CpuFeature::Bmi1 => "bmi1",
            CpuFeature::Bmi2 => "bmi2",
            CpuFeature::Avx512f => "avx512f",
            CpuFeature::Avx512vl => "avx512vl",
            CpuFeature::Avx512bw => "avx512bw",
            CpuFeature::Avx512dq => "avx512dq",
            CpuFeature::Avx512cd => "avx512cd",
            CpuFeature::Neon => "neon",
        }
    }

    /// Returns whether the build was compiled to target this feature.
    pub const fn is_compiled_target(&self) -> bool {
        match self {
            CpuFeature::Sse2 => cfg!(target_feature = "sse2"),
            CpuFeature::Sse3 => cfg!(target_feature = "sse3"),
            CpuFeature::Ssse3 => cfg!(target_feature = "ssse3"),
            CpuFeature::Sse41 => cfg!(target_feature = "sse4.1"),
            CpuFeature::Sse42 => cfg!(target_feature = "sse4.2"),
            CpuFeature::Popcnt => cfg!(target_feature = "popcnt"),
            CpuFeature::Avx => cfg!(target_feature = "avx"),
            CpuFeature::Avx2 => cfg!(target_feature = "avx2"),
            CpuFeature::Fma => cfg!(target_feature = "fma"),
            CpuFeature::F16c => cfg!(target_feature = "f16c"),
            CpuFeature::Bmi1 => cfg!(target_feature = "bmi1"),
            CpuFeature::Bmi2 => cfg!(target_feature = "bmi2"),
            CpuFeature::Avx512f => cfg!(target_feature = "avx512f"),
            CpuFeature::Avx512vl => cfg!(target_feature = "avx512vl"),
            CpuFeature::Avx512bw => cfg!(target_feature = "avx512bw"),
            CpuFeature::Avx512dq => cfg!(target_feature = "avx512dq"),
            CpuFeature::Avx512cd => cfg!(target_feature = "avx512cd"),
            CpuFeature::Neon => cfg!(target_feature = "neon"),
        }
    }

    /// Queries the host processor for this feature.
    ///
    /// Features belonging to another architecture are reported as missing.
    pub fn is_detected(&self) -> bool {
        cfg_if! {
            if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
                match self {
                    CpuFeature::Sse2 => is_x86_feature_detected!("sse2"),
                    CpuFeature::Sse3 => is_x86_feature_detected!("sse3"),
                    CpuFeature::Ssse3 => is_x86_feature_detected!("ssse3"),
                    CpuFeature::Sse41 => is_x86_feature_detected!("sse4.1"),
                    CpuFeature::Sse42 => is_x86_feature_detected!("sse4.2"),
                    CpuFeature::Popcnt => is_x86_feature_detected!("popcnt"),
                    CpuFeature::Avx => is_x86_feature_detected!("avx"),
                    CpuFeature::Avx2 => is_x86_feature_detected!("avx2"),
                    CpuFeature::Fma => is_x86_feature_detected!("fma"),
                    CpuFeature::F16c => is_x86_feature_detected!("f16c"),
                    CpuFeature::Bmi1 => is_x86_feature_detected!("bmi1"),
                    CpuFeature::Bmi2 => is_x86_feature_detected!("bmi2"),
                    CpuFeature::Avx512f => is_x86_feature_detected!("avx512f"),
                    CpuFeature::Avx512vl => is_x86_feature_detected!("avx512vl"),
                    CpuFeature::Avx512bw => is_x86_feature_detected!("avx512bw"),
                    CpuFeature::Avx512dq => is_x86_feature_detected!("avx512dq"),
                    CpuFeature::Avx512cd => is_x86_feature_detected!("avx512cd"),
                    CpuFeature::Neon => false,
                }
            } else if #[cfg(target_arch = "aarch64")] {
                match self {
                    CpuFeature::Neon => std::arch::is_aarch64_feature_detected!("neon"),
                    _ => false,
                }
            } else {
                false
            }
        }
    }
}

impl Display for CpuFeature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

/// Returns the extensions the build was compiled to target.
pub fn compiled_target_features() -> Vec<CpuFeature> {
    CpuFeature::ALL
        .into_iter()
        .filter(CpuFeature::is_compiled_target)
        .collect()
}

/// Checks `required` against the host processor.
pub fn verify_host(required: &[CpuFeature]) -> Result<(), FatalEnvironmentError> {
    verify_with(required, |feature| feature.is_detected())
}

/// Checks `required` against an arbitrary capability detector.
///
/// Every missing feature is reported, not just the first one.
pub fn verify_with<P>(required: &[CpuFeature], detect: P) -> Result<(), FatalEnvironmentError>
where
    P: Fn(CpuFeature) -> bool,
{
    let missing = required
        .iter()
        .copied()
        .filter(|feature| {
            let present = detect(*feature);
            log::debug!("cpu feature {:<8} {}", feature, if present { "present" } else { "MISSING" });
            !present
        })
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FatalEnvironmentError { missing })
    }
}
