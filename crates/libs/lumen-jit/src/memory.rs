//! Default code emitter backed by anonymous memory mappings.
//!
//! Each region gets its own page-aligned mapping, written while
//! read-write and then flipped to read-execute before it is handed out, so
//! no page is ever writable and executable at the same time.

use crate::{
    emitter::{CodeEmitter, CodeRegion, RegionId},
    error::JitError,
};
use cfg_if::cfg_if;
use std::{collections::BTreeMap, ptr::NonNull};

/// Emitter placing every code region into a dedicated page mapping.
#[derive(Debug, Default)]
pub struct ExecutableMemory {
    mappings: BTreeMap<RegionId, Mapping>,
    next_id: u64,
}

impl ExecutableMemory {
    /// Creates an emitter with no regions.
    pub fn new() -> Self { Self::default() }
}

impl CodeEmitter for ExecutableMemory {
    fn emit(&mut self, code: &[u8]) -> Result<CodeRegion, JitError> {
        if code.is_empty() {
            return Err(JitError::EmptyCode);
        }
        let mapping = Mapping::with_code(code)?;
        let id = RegionId(self.next_id);
        self.next_id += 1;
        let region = CodeRegion::new(id, mapping.ptr.as_ptr(), mapping.len);
        log::trace!(
            "mapped {} bytes of code at {:p} ({} bytes reserved)",
            mapping.len,
            mapping.ptr,
            mapping.capacity
        );
        self.mappings.insert(id, mapping);
        Ok(region)
    }

    fn release(&mut self, id: RegionId) -> bool { self.mappings.remove(&id).is_some() }

    fn release_all(&mut self) -> usize {
        let count = self.mappings.len();
        self.mappings.clear();
        count
    }

    fn live_regions(&self) -> usize { self.mappings.len() }

    fn live_bytes(&self) -> usize { self.mappings.values().map(|m| m.len).sum() }
}

/// One page-aligned read-execute mapping, unmapped on drop.
#[derive(Debug)]
struct Mapping {
    ptr: NonNull<u8>,
    len: usize,
    capacity: usize,
}

// SAFETY: the mapping is exclusively owned and never written after creation.
unsafe impl Send for Mapping {}

cfg_if! {
    if #[cfg(unix)] {
        impl Mapping {
            fn with_code(code: &[u8]) -> Result<Self, JitError> {
                let page = page_size();
                let capacity = (code.len() + page - 1) & !(page - 1);

                // SAFETY: a fresh private anonymous mapping aliases nothing;
                // `code` fits because `capacity >= code.len()`.
                unsafe {
                    let addr = libc::mmap(
                        std::ptr::null_mut(),
                        capacity,
                        libc::PROT_READ | libc::PROT_WRITE,
                        libc::MAP_PRIVATE | libc::MAP_ANON,
                        -1,
                        0,
                    );
                    if addr == libc::MAP_FAILED {
                        return Err(JitError::Allocation(std::io::Error::last_os_error()));
                    }
                    let ptr = NonNull::new_unchecked(addr as *mut u8);
                    std::ptr::copy_nonoverlapping(code.as_ptr(), ptr.as_ptr(), code.len());

                    if libc::mprotect(addr, capacity, libc::PROT_READ | libc::PROT_EXEC) != 0 {
                        let err = std::io::Error::last_os_error();
                        libc::munmap(addr, capacity);
                        return Err(JitError::Protection(err));
                    }

                    Ok(Self {
                        ptr,
                        len: code.len(),
                        capacity,
                    })
                }
            }
        }

        impl Drop for Mapping {
            fn drop(&mut self) {
                // SAFETY: the mapping was created by `with_code` with this
                // exact length and nothing refers to it anymore.
                unsafe {
                    libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.capacity);
                }
            }
        }

        fn page_size() -> usize {
            // SAFETY: sysconf has no preconditions.
            match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
                size if size > 0 => size as usize,
                _ => 4096,
            }
        }
    } else {
        impl Mapping {
            fn with_code(_code: &[u8]) -> Result<Self, JitError> {
                Err(JitError::UnsupportedPlatform)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_is_rejected() {
        let mut memory = ExecutableMemory::new();
        assert!(matches!(memory.emit(&[]), Err(JitError::EmptyCode)));
        assert_eq!(memory.live_regions(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn bookkeeping() {
        let mut memory = ExecutableMemory::new();
        let a = memory.emit(&[0x90; 10]).unwrap();
        let b = memory.emit(&[0x90; 5000]).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.len(), 10);
        assert_eq!(memory.live_regions(), 2);
        assert_eq!(memory.live_bytes(), 5010);

        // The copied bytes are readable through the entry point.
        let bytes = unsafe { std::slice::from_raw_parts(b.entry(), b.len()) };
        assert!(bytes.iter().all(|&byte| byte == 0x90));

        assert!(memory.release(a.id()));
        assert!(!memory.release(a.id()));
        assert_eq!(memory.live_regions(), 1);
        assert_eq!(memory.release_all(), 1);
        assert_eq!(memory.live_bytes(), 0);
    }

    #[test]
    #[cfg(all(unix, target_arch = "x86_64"))]
    fn emitted_code_runs() {
        let mut memory = ExecutableMemory::new();
        // mov eax, 42; ret
        let region = memory.emit(&[0xB8, 0x2A, 0x00, 0x00, 0x00, 0xC3]).unwrap();
        let answer: extern "C" fn() -> i32 = unsafe { region.as_fn() };
        assert_eq!(answer(), 42);
    }

    #[test]
    #[cfg(not(unix))]
    fn unsupported_platform() {
        let mut memory = ExecutableMemory::new();
        assert!(matches!(memory.emit(&[0xC3]), Err(JitError::UnsupportedPlatform)));
    }
}
