//! Process-wide JIT runtime for lumen.
//!
//! Before the runtime can be used the host processor is checked against the
//! instruction set extensions the generated code relies on; a host that falls
//! short aborts the process. After that a single shared [`Jit`] hands out
//! executable code regions until [`static_shutdown`] releases them all.
//!
//! ```no_run
//! let lifetime = lumen_jit::static_initialization();
//! let jit = lumen_jit::get_instance();
//! let region = jit.emit(&[0xC3]).unwrap();
//! drop(lifetime); // releases `region`
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod cpu;
pub mod emitter;
pub mod error;
pub mod manager;
pub mod memory;
mod runtime;

pub use config::JitOptions;
pub use cpu::CpuFeature;
pub use emitter::{CodeEmitter, CodeRegion, RegionId};
pub use error::{FatalEnvironmentError, JitError};
pub use manager::{Jit, JitManager, JitState};
pub use memory::ExecutableMemory;
pub use runtime::*;
