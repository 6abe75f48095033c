//! The process-wide runtime can only be brought up and shut down once per
//! process, so the whole lifecycle is exercised by a single test.

use lumen_jit::{JitError, JitState};
use std::{sync::Arc, thread};

#[cfg(target_arch = "x86_64")]
fn return_42() -> Vec<u8> {
    // mov eax, 42; ret
    vec![0xB8, 0x2A, 0x00, 0x00, 0x00, 0xC3]
}

#[cfg(target_arch = "aarch64")]
fn return_42() -> Vec<u8> {
    // mov w0, #42; ret
    [0x5280_0540u32, 0xD65F_03C0]
        .iter()
        .flat_map(|insn| insn.to_le_bytes())
        .collect()
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn return_42() -> Vec<u8> { vec![0] }

#[test]
fn global_lifecycle() {
    let _ = env_logger::try_init();

    assert_eq!(lumen_jit::state(), JitState::Uninitialized);
    assert!(matches!(
        lumen_jit::try_get_instance(),
        Err(JitError::NotReady(JitState::Uninitialized))
    ));

    let lifetime = lumen_jit::static_initialization();
    assert!(lifetime.is_owner());
    assert_eq!(lumen_jit::state(), JitState::Ready);

    let instances = thread::scope(|s| {
        let handles = (0..8)
            .map(|_| s.spawn(lumen_jit::get_instance))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert!(instances.iter().all(|jit| Arc::ptr_eq(jit, &instances[0])));
    assert!(std::ptr::eq(lifetime.instance(), &*instances[0]));

    let jit = lumen_jit::get_instance();
    if cfg!(unix) {
        let region = jit.emit(&return_42()).unwrap();
        assert_eq!(jit.live_regions(), 1);
        #[cfg(all(unix, target_arch = "x86_64"))]
        {
            let answer: extern "C" fn() -> i32 = unsafe { region.as_fn() };
            assert_eq!(answer(), 42);
        }
        let _ = region;
    } else {
        assert!(matches!(
            jit.emit(&return_42()),
            Err(JitError::UnsupportedPlatform)
        ));
    }

    lumen_jit::static_shutdown();
    assert_eq!(lumen_jit::state(), JitState::ShutDown);
    assert_eq!(jit.live_regions(), 0);
    assert!(jit.emit(&return_42()).is_err());
    assert!(lumen_jit::try_get_instance().is_err());
    assert!(std::panic::catch_unwind(lumen_jit::get_instance).is_err());

    // Dropping the handle after an explicit shutdown is harmless.
    drop(lifetime);
    assert_eq!(lumen_jit::state(), JitState::ShutDown);
}
