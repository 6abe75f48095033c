//! Runtime options, loaded from TOML.

use crate::{
    cpu::{compiled_target_features, CpuFeature},
    error::JitError,
};
use serde::{Deserialize, Serialize};

/// Options the JIT runtime is initialised with.
///
/// Loaded from a TOML table; every field is optional.
///
/// ```toml
/// required_features = ["sse4.2", "avx2"]
/// extra_features = ["fma"]
/// max_live_regions = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitOptions {
    /// Extensions the host must offer. Defaults to everything the build was
    /// compiled to target.
    pub required_features: Vec<CpuFeature>,
    /// Extensions required on top of `required_features`.
    pub extra_features: Vec<CpuFeature>,
    /// Cap on simultaneously live code regions; `None` means unlimited.
    pub max_live_regions: Option<usize>,
}

impl Default for JitOptions {
    fn default() -> Self {
        Self {
            required_features: compiled_target_features(),
            extra_features: Vec::new(),
            max_live_regions: None,
        }
    }
}

impl JitOptions {
    /// Parses options from a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self, JitError> { Ok(toml::from_str(src)?) }

    /// Every feature the host has to offer, sorted and without duplicates.
    pub fn required(&self) -> Vec<CpuFeature> {
        let mut features = self
            .required_features
            .iter()
            .chain(self.extra_features.iter())
            .copied()
            .collect::<Vec<_>>();
        features.sort_unstable();
        features.dedup();
        features
    }
}
