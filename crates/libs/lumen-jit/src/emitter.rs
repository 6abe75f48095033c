//! Code emission backends and the handles they return.

use crate::error::JitError;
use std::fmt::{Debug, Formatter};

/// Identifier of a code region, unique within the emitter that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub(crate) u64);

/// Handle to machine code placed in executable memory.
///
/// The handle does not own the memory; it stays valid until the region is
/// released through its emitter, or the runtime shuts down.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CodeRegion {
    id: RegionId,
    entry: *const u8,
    len: usize,
}

// SAFETY: the region is immutable once emitted; the pointer is only an
// address until someone calls `as_fn`.
unsafe impl Send for CodeRegion {}
unsafe impl Sync for CodeRegion {}

impl CodeRegion {
    /// Creates a handle for code starting at `entry`.
    pub fn new(id: RegionId, entry: *const u8, len: usize) -> Self { Self { id, entry, len } }

    /// Identifier within the emitter.
    pub fn id(&self) -> RegionId { self.id }

    /// Address of the first instruction.
    pub fn entry(&self) -> *const u8 { self.entry }

    /// Size of the emitted code in bytes.
    pub fn len(&self) -> usize { self.len }

    /// Whether the region holds no code.
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Reinterprets the entry point as a function pointer.
    ///
    /// # Safety
    ///
    /// `F` must be a function pointer type whose signature and calling
    /// convention match the emitted code, and the region must not have been
    /// released.
    #[inline]
    pub unsafe fn as_fn<F: Copy>(&self) -> F {
        debug_assert_eq!(
            std::mem::size_of::<F>(),
            std::mem::size_of::<*const u8>(),
            "as_fn target must be a function pointer"
        );
        std::mem::transmute_copy(&self.entry)
    }
}

impl Debug for CodeRegion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeRegion")
            .field("id", &self.id.0)
            .field("entry", &self.entry)
            .field("len", &self.len)
            .finish()
    }
}

/// Backend turning machine code bytes into callable code.
///
/// The runtime owns exactly one emitter and serialises access to it, so
/// implementations need no internal locking.
pub trait CodeEmitter: Send {
    /// Copies `code` into executable memory.
    fn emit(&mut self, code: &[u8]) -> Result<CodeRegion, JitError>;

    /// Frees a single region. Returns `false` if the id is unknown, e.g.
    /// already released.
    fn release(&mut self, id: RegionId) -> bool;

    /// Frees every live region, returning how many there were.
    fn release_all(&mut self) -> usize;

    /// Number of regions emitted and not yet released.
    fn live_regions(&self) -> usize;

    /// Total size in bytes of the code held by live regions.
    fn live_bytes(&self) -> usize;
}
