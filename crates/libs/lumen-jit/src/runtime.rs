//! The process-wide JIT runtime.
//!
//! One [`JitManager`] lives for the whole process. The application brings it
//! up once with [`static_initialization`], consumers share it through
//! [`get_instance`] or a [`JitLifetime`], and [`static_shutdown`] releases all
//! generated code at the end.

use crate::{
    config::JitOptions,
    error::JitError,
    manager::{Jit, JitManager, JitState},
};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    static ref JIT: JitManager = JitManager::new();
}

/// Checks the host with the default options and brings the runtime up.
///
/// Aborts the process if the host lacks an extension the build was compiled
/// for. Must be called before any other entry point of this module.
#[must_use = "dropping the owning lifetime shuts the JIT runtime down"]
pub fn static_initialization() -> JitLifetime { static_initialization_with(&JitOptions::default()) }

/// Same as [`static_initialization`] with explicit options.
#[must_use = "dropping the owning lifetime shuts the JIT runtime down"]
pub fn static_initialization_with(options: &JitOptions) -> JitLifetime {
    let owner = match JIT.initialize(options) {
        Ok(owner) => owner,
        Err(err) => fatal(err),
    };
    match JIT.instance() {
        Ok(instance) => JitLifetime { instance, owner },
        // Only reachable when initialising after shutdown.
        Err(err) => fatal(err),
    }
}

fn fatal(err: impl std::fmt::Display) -> ! {
    log::error!("{}", err);
    eprintln!("fatal: {}", err);
    std::process::abort()
}

/// Releases all generated code and moves the runtime to its terminal state.
pub fn static_shutdown() { JIT.shutdown(); }

/// Returns the runtime.
///
/// # Panics
///
/// Panics if called before [`static_initialization`] or after
/// [`static_shutdown`].
pub fn get_instance() -> Arc<Jit> {
    match JIT.instance() {
        Ok(instance) => instance,
        Err(err) => panic!("get_instance called outside the ready state: {}", err),
    }
}

/// Returns the runtime, or why it is not available.
pub fn try_get_instance() -> Result<Arc<Jit>, JitError> { JIT.instance() }

/// Current state of the process-wide runtime.
pub fn state() -> JitState { JIT.state() }

/// Handle to the process-wide runtime.
///
/// The handle returned by the call that brought the runtime up owns it:
/// dropping that one runs [`static_shutdown`], which invalidates every code
/// region emitted so far, so keep it alive for as long as generated code may
/// run. Handles from repeated initialisation calls only borrow the runtime
/// and do nothing on drop.
#[derive(Debug)]
pub struct JitLifetime {
    instance: Arc<Jit>,
    owner: bool,
}

impl JitLifetime {
    /// The runtime this handle refers to.
    pub fn instance(&self) -> &Jit { &self.instance }

    /// Whether dropping this handle shuts the runtime down.
    pub fn is_owner(&self) -> bool { self.owner }
}

impl Drop for JitLifetime {
    fn drop(&mut self) {
        if self.owner {
            static_shutdown();
        }
    }
}
