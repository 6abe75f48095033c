use lumen_jit::{JitOptions, JitState};

#[test]
fn dropping_the_lifetime_shuts_down() {
    let _ = env_logger::try_init();

    let options = JitOptions::from_toml_str("max_live_regions = 4").unwrap();
    let lifetime = lumen_jit::static_initialization_with(&options);
    let jit = lumen_jit::get_instance();
    assert_eq!(jit.live_regions(), 0);
    assert_eq!(lifetime.instance().live_regions(), 0);

    drop(lifetime);
    assert_eq!(lumen_jit::state(), JitState::ShutDown);
    assert!(jit.is_retired());
    assert!(lumen_jit::try_get_instance().is_err());
}
