use lumen_jit::JitState;

#[test]
fn only_the_first_handle_owns_the_runtime() {
    let _ = env_logger::try_init();

    let first = lumen_jit::static_initialization();
    let second = lumen_jit::static_initialization();
    assert!(first.is_owner());
    assert!(!second.is_owner());
    assert!(std::ptr::eq(first.instance(), second.instance()));

    let jit = lumen_jit::get_instance();
    drop(second);
    assert_eq!(lumen_jit::state(), JitState::Ready);
    assert!(!jit.is_retired());
    if cfg!(unix) {
        jit.emit(&[0xC3]).unwrap();
        assert_eq!(jit.live_regions(), 1);
    }

    drop(first);
    assert_eq!(lumen_jit::state(), JitState::ShutDown);
    assert!(jit.is_retired());
    assert_eq!(jit.live_regions(), 0);
}
