//! Error types of the JIT runtime.

use crate::{cpu::CpuFeature, manager::JitState};

/// Errors raised while using the JIT runtime.
#[derive(Debug, thiserror::Error)]
pub enum JitError {
    /// Emitting zero bytes of code.
    #[error("Cannot emit an empty code buffer")]
    EmptyCode,
    /// Configured cap on simultaneously live code regions reached.
    #[error("Live code region limit of {limit} reached")]
    RegionLimit {
        /// Configured maximum.
        limit: usize,
    },
    /// Runtime used outside the `Ready` state.
    #[error("JIT runtime is not ready (state: {0})")]
    NotReady(JitState),
    /// Mapping memory for generated code failed.
    #[error("Failed to allocate code memory: {0}")]
    Allocation(#[source] std::io::Error),
    /// Switching generated code from writable to executable failed.
    #[error("Failed to make code memory executable: {0}")]
    Protection(#[source] std::io::Error),
    /// Executable memory is not available on this platform.
    #[error("Executable memory is not supported on this platform")]
    UnsupportedPlatform,
    /// Runtime options could not be parsed.
    #[error("Invalid JIT configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// The host processor cannot run the code the JIT produces.
///
/// There is no recovery from this; the global entry points log it and abort
/// the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Host processor lacks required instruction set extensions: {}", join_features(.missing))]
pub struct FatalEnvironmentError {
    /// Every required feature the host was found lacking.
    pub missing: Vec<CpuFeature>,
}

fn join_features(features: &[CpuFeature]) -> String {
    features
        .iter()
        .map(CpuFeature::name)
        .collect::<Vec<_>>()
        .join(", ")
}
