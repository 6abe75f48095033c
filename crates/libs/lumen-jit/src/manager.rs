//! Lifecycle of a JIT runtime and the shared code-generation context.

use crate::{
    config::JitOptions,
    cpu::{verify_with, CpuFeature},
    emitter::{CodeEmitter, CodeRegion, RegionId},
    error::{FatalEnvironmentError, JitError},
    memory::ExecutableMemory,
};
use std::{
    fmt::{Display, Formatter},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

/// Lifecycle state of the JIT runtime.
///
/// `Uninitialized -> Ready -> ShutDown`; `ShutDown` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JitState {
    /// The host has not been checked yet.
    Uninitialized,
    /// The host passed the capability check; the runtime can be used.
    Ready,
    /// All code has been released; the runtime cannot be used again.
    ShutDown,
}

impl Display for JitState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JitState::Uninitialized => f.write_str("uninitialized"),
            JitState::Ready => f.write_str("ready"),
            JitState::ShutDown => f.write_str("shut down"),
        }
    }
}

/// Creates the emitter backing a new runtime instance.
pub type EmitterFactory = fn() -> Box<dyn CodeEmitter>;

/// Answers whether the host offers a feature.
pub type FeatureDetector = fn(CpuFeature) -> bool;

fn default_emitter() -> Box<dyn CodeEmitter> { Box::new(ExecutableMemory::new()) }

fn host_detect(feature: CpuFeature) -> bool { feature.is_detected() }

/// The JIT runtime: a code-generation context shared by every consumer.
///
/// Obtained from [`JitManager::instance`]; there is never more than one per
/// manager. All mutation goes through the internal lock.
pub struct Jit {
    emitter: Mutex<Box<dyn CodeEmitter>>,
    max_live_regions: Option<usize>,
    retired: AtomicBool,
}

impl Jit {
    fn new(emitter: Box<dyn CodeEmitter>, max_live_regions: Option<usize>) -> Self {
        Self {
            emitter: Mutex::new(emitter),
            max_live_regions,
            retired: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn CodeEmitter>> {
        self.emitter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Places `code` into executable memory.
    pub fn emit(&self, code: &[u8]) -> Result<CodeRegion, JitError> {
        self.with_emitter(|emitter| emitter.emit(code))?
    }

    /// Releases a region emitted by this runtime. Returns `false` if it was
    /// already released.
    pub fn release(&self, region: &CodeRegion) -> bool {
        let released = self.lock().release(region.id());
        log::debug!("released code region {:?}: {}", region.id(), released);
        released
    }

    /// Number of regions emitted and not yet released.
    pub fn live_regions(&self) -> usize { self.lock().live_regions() }

    /// Total size in bytes of the live regions.
    pub fn live_bytes(&self) -> usize { self.lock().live_bytes() }

    /// Whether the runtime has been shut down.
    pub fn is_retired(&self) -> bool { self.retired.load(Ordering::Acquire) }

    /// Runs `f` with exclusive access to the emitter, for sequences of
    /// operations that must not interleave with other threads.
    ///
    /// The emitter handed to `f` enforces the live region cap. Fails with
    /// `NotReady(ShutDown)` once the runtime has been shut down.
    pub fn with_emitter<R>(&self, f: impl FnOnce(&mut dyn CodeEmitter) -> R) -> Result<R, JitError> {
        let mut emitter = self.lock();
        if self.retired.load(Ordering::Acquire) {
            return Err(JitError::NotReady(JitState::ShutDown));
        }
        let mut guarded = Guarded {
            inner: &mut **emitter,
            limit: self.max_live_regions,
        };
        Ok(f(&mut guarded))
    }

    fn retire(&self) -> usize {
        let mut emitter = self.lock();
        self.retired.store(true, Ordering::Release);
        emitter.release_all()
    }
}

/// Emitter view applying the runtime's region cap.
struct Guarded<'a> {
    inner: &'a mut dyn CodeEmitter,
    limit: Option<usize>,
}

impl CodeEmitter for Guarded<'_> {
    fn emit(&mut self, code: &[u8]) -> Result<CodeRegion, JitError> {
        if let Some(limit) = self.limit {
            if self.inner.live_regions() >= limit {
                log::warn!("refusing to emit code: {} regions already live", limit);
                return Err(JitError::RegionLimit { limit });
            }
        }
        let region = self.inner.emit(code)?;
        log::debug!("emitted code region {:?} ({} bytes)", region.id(), region.len());
        Ok(region)
    }

    fn release(&mut self, id: RegionId) -> bool { self.inner.release(id) }

    fn release_all(&mut self) -> usize { self.inner.release_all() }

    fn live_regions(&self) -> usize { self.inner.live_regions() }

    fn live_bytes(&self) -> usize { self.inner.live_bytes() }
}

impl std::fmt::Debug for Jit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jit")
            .field("max_live_regions", &self.max_live_regions)
            .field("retired", &self.is_retired())
            .finish_non_exhaustive()
    }
}

struct Inner {
    state: JitState,
    options: Option<JitOptions>,
    instance: Option<Arc<Jit>>,
}

/// Owner of the JIT runtime lifecycle.
///
/// The process-wide manager behind [`crate::static_initialization`] is one of
/// these; separate managers are fully independent.
pub struct JitManager {
    inner: Mutex<Inner>,
    factory: EmitterFactory,
    detect: FeatureDetector,
}

impl Default for JitManager {
    fn default() -> Self { Self::new() }
}

impl JitManager {
    /// Manager probing the real host and emitting into [`ExecutableMemory`].
    pub fn new() -> Self { Self::with_backend(default_emitter, host_detect) }

    /// Manager with a custom emitter and capability detector.
    pub fn with_backend(factory: EmitterFactory, detect: FeatureDetector) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: JitState::Uninitialized,
                options: None,
                instance: None,
            }),
            factory,
            detect,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> { self.inner.lock().unwrap_or_else(PoisonError::into_inner) }

    /// Current lifecycle state.
    pub fn state(&self) -> JitState { self.lock().state }

    /// Checks the host against `options` and moves to `Ready`.
    ///
    /// Only the first call from `Uninitialized` does anything and returns
    /// `true`; later calls are logged, ignored and return `false`.
    pub fn initialize(&self, options: &JitOptions) -> Result<bool, FatalEnvironmentError> {
        let mut inner = self.lock();
        match inner.state {
            JitState::Uninitialized => {},
            JitState::Ready => {
                log::warn!("JIT runtime already initialised, ignoring");
                return Ok(false);
            },
            JitState::ShutDown => {
                log::warn!("JIT runtime has been shut down and cannot be initialised again");
                return Ok(false);
            },
        }

        let required = options.required();
        verify_with(&required, self.detect)?;
        log::info!(
            "JIT runtime ready, host offers {} required cpu features",
            required.len()
        );
        inner.options = Some(options.clone());
        inner.state = JitState::Ready;
        Ok(true)
    }

    /// Returns the runtime, creating it on first use.
    ///
    /// Concurrent first calls all observe the same instance.
    pub fn instance(&self) -> Result<Arc<Jit>, JitError> {
        let mut inner = self.lock();
        if inner.state != JitState::Ready {
            return Err(JitError::NotReady(inner.state));
        }
        if let Some(jit) = &inner.instance {
            return Ok(Arc::clone(jit));
        }
        let max_live_regions = inner.options.as_ref().and_then(|o| o.max_live_regions);
        let jit = Arc::new(Jit::new((self.factory)(), max_live_regions));
        log::debug!("created JIT runtime instance");
        inner.instance = Some(Arc::clone(&jit));
        Ok(jit)
    }

    /// Releases all generated code and enters the terminal `ShutDown` state.
    ///
    /// Returns the number of code regions released. Handles to the runtime
    /// obtained earlier stay alive but refuse to emit.
    pub fn shutdown(&self) -> usize {
        let mut inner = self.lock();
        if inner.state == JitState::ShutDown {
            log::warn!("JIT runtime already shut down");
            return 0;
        }
        let released = inner.instance.take().map_or(0, |jit| jit.retire());
        inner.state = JitState::ShutDown;
        log::info!("JIT runtime shut down, released {} code regions", released);
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::RegionId;
    use std::{
        collections::BTreeSet,
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    /// Emitter handing out fake regions; no memory is mapped.
    #[derive(Default)]
    struct FakeEmitter {
        live: BTreeSet<u64>,
        next: u64,
        bytes: usize,
    }

    impl CodeEmitter for FakeEmitter {
        fn emit(&mut self, code: &[u8]) -> Result<CodeRegion, JitError> {
            if code.is_empty() {
                return Err(JitError::EmptyCode);
            }
            let id = self.next;
            self.next += 1;
            self.live.insert(id);
            self.bytes += code.len();
            Ok(CodeRegion::new(RegionId(id), std::ptr::null(), code.len()))
        }

        fn release(&mut self, id: RegionId) -> bool { self.live.remove(&id.0) }

        fn release_all(&mut self) -> usize {
            let n = self.live.len();
            self.live.clear();
            n
        }

        fn live_regions(&self) -> usize { self.live.len() }

        fn live_bytes(&self) -> usize { if self.live.is_empty() { 0 } else { self.bytes } }
    }

    fn fake() -> Box<dyn CodeEmitter> { Box::new(FakeEmitter::default()) }

    fn everything(_: CpuFeature) -> bool { true }

    fn nothing(_: CpuFeature) -> bool { false }

    fn manager() -> JitManager { JitManager::with_backend(fake, everything) }

    #[test]
    fn lifecycle() {
        let _ = env_logger::try_init();
        let jit = manager();
        assert_eq!(jit.state(), JitState::Uninitialized);
        assert!(matches!(
            jit.instance(),
            Err(JitError::NotReady(JitState::Uninitialized))
        ));

        jit.initialize(&JitOptions::default()).unwrap();
        assert_eq!(jit.state(), JitState::Ready);

        let instance = jit.instance().unwrap();
        instance.emit(&[0xC3]).unwrap();
        instance.emit(&[0x90, 0xC3]).unwrap();
        assert_eq!(instance.live_regions(), 2);

        assert_eq!(jit.shutdown(), 2);
        assert_eq!(jit.state(), JitState::ShutDown);
        assert_eq!(instance.live_regions(), 0);
        assert!(instance.is_retired());
        assert!(matches!(
            instance.emit(&[0xC3]),
            Err(JitError::NotReady(JitState::ShutDown))
        ));
        assert!(matches!(
            jit.instance(),
            Err(JitError::NotReady(JitState::ShutDown))
        ));
    }

    #[test]
    fn shutdown_is_terminal() {
        let jit = manager();
        assert!(jit.initialize(&JitOptions::default()).unwrap());
        jit.shutdown();
        assert!(!jit.initialize(&JitOptions::default()).unwrap());
        assert_eq!(jit.state(), JitState::ShutDown);
        assert_eq!(jit.shutdown(), 0);
    }

    #[test]
    fn double_initialization_is_ignored() {
        let jit = manager();
        assert!(jit.initialize(&JitOptions::default()).unwrap());
        let first = jit.instance().unwrap();
        let repeated = jit
            .initialize(&JitOptions {
                max_live_regions: Some(1),
                ..JitOptions::default()
            })
            .unwrap();
        assert!(!repeated);
        assert!(Arc::ptr_eq(&first, &jit.instance().unwrap()));
        // The second set of options never took effect.
        first.emit(&[1]).unwrap();
        first.emit(&[2]).unwrap();
    }

    #[test]
    fn missing_features_keep_runtime_unusable() {
        let jit = JitManager::with_backend(fake, nothing);
        let options = JitOptions {
            required_features: vec![CpuFeature::Avx2],
            extra_features: vec![CpuFeature::Fma],
            max_live_regions: None,
        };
        let err = jit.initialize(&options).unwrap_err();
        assert_eq!(err.missing, vec![CpuFeature::Avx2, CpuFeature::Fma]);
        assert_eq!(jit.state(), JitState::Uninitialized);
        assert!(jit.instance().is_err());
    }

    #[test]
    fn nothing_required_passes_any_host() {
        let jit = JitManager::with_backend(fake, nothing);
        let options = JitOptions {
            required_features: vec![],
            ..JitOptions::default()
        };
        assert!(jit.initialize(&options).is_ok());
    }

    #[test]
    fn concurrent_instance_is_unique() {
        static CREATED: AtomicUsize = AtomicUsize::new(0);
        fn counting() -> Box<dyn CodeEmitter> {
            CREATED.fetch_add(1, Ordering::SeqCst);
            fake()
        }

        let jit = JitManager::with_backend(counting, everything);
        jit.initialize(&JitOptions::default()).unwrap();
        let instances = thread::scope(|s| {
            let handles = (0..16)
                .map(|_| s.spawn(|| jit.instance().unwrap()))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_emission() {
        let jit = manager();
        jit.initialize(&JitOptions::default()).unwrap();
        let instance = jit.instance().unwrap();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        instance.emit(&[0xC3]).unwrap();
                    }
                });
            }
        });
        assert_eq!(instance.live_regions(), 800);
        assert_eq!(jit.shutdown(), 800);
    }

    #[test]
    fn region_limit() {
        let jit = manager();
        jit.initialize(&JitOptions {
            max_live_regions: Some(2),
            ..JitOptions::default()
        })
        .unwrap();
        let instance = jit.instance().unwrap();
        let a = instance.emit(&[1]).unwrap();
        instance.emit(&[2]).unwrap();
        assert!(matches!(
            instance.emit(&[3]),
            Err(JitError::RegionLimit { limit: 2 })
        ));
        assert!(instance.release(&a));
        assert!(!instance.release(&a));
        assert!(instance.emit(&[3]).is_ok());
    }

    #[test]
    fn with_emitter_groups_operations() {
        let jit = manager();
        jit.initialize(&JitOptions::default()).unwrap();
        let instance = jit.instance().unwrap();
        let (first, second) = instance
            .with_emitter(|e| {
                let first = e.emit(&[1, 2, 3]).unwrap();
                let second = e.emit(&[4]).unwrap();
                (first, second)
            })
            .unwrap();
        assert_eq!(second.id().0, first.id().0 + 1);
        assert_eq!(instance.live_bytes(), 4);
        assert!(matches!(instance.emit(&[]), Err(JitError::EmptyCode)));
    }

    #[test]
    fn with_emitter_is_closed_after_shutdown() {
        let jit = manager();
        jit.initialize(&JitOptions::default()).unwrap();
        let instance = jit.instance().unwrap();
        instance.emit(&[0xC3]).unwrap();
        assert_eq!(jit.shutdown(), 1);

        let mut ran = false;
        let result = instance.with_emitter(|e| {
            ran = true;
            e.emit(&[0xC3])
        });
        assert!(matches!(result, Err(JitError::NotReady(JitState::ShutDown))));
        assert!(!ran);
        assert_eq!(instance.live_regions(), 0);
    }

    #[test]
    fn with_emitter_respects_region_limit() {
        let jit = manager();
        jit.initialize(&JitOptions {
            max_live_regions: Some(1),
            ..JitOptions::default()
        })
        .unwrap();
        let instance = jit.instance().unwrap();
        let (first, second) = instance
            .with_emitter(|e| (e.emit(&[1]), e.emit(&[2])))
            .unwrap();
        assert!(first.is_ok());
        assert!(matches!(second, Err(JitError::RegionLimit { limit: 1 })));
        assert_eq!(instance.live_regions(), 1);

        // Releasing inside the same critical section frees a slot.
        let third = instance
            .with_emitter(|e| {
                e.release_all();
                e.emit(&[3])
            })
            .unwrap();
        assert!(third.is_ok());
        assert_eq!(instance.live_regions(), 1);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let jit = manager();
        jit.initialize(&JitOptions::default()).unwrap();
        let instance = jit.instance().unwrap();
        let result = thread::scope(|s| {
            s.spawn(|| instance.with_emitter(|_| panic!("emitter user panicked")))
                .join()
        });
        assert!(result.is_err());
        assert!(instance.emit(&[0xC3]).is_ok());
        assert_eq!(jit.shutdown(), 1);
    }

    #[test]
    fn state_display() {
        assert_eq!(JitState::Ready.to_string(), "ready");
        assert_eq!(
            JitError::NotReady(JitState::ShutDown).to_string(),
            "JIT runtime is not ready (state: shut down)"
        );
    }
}
