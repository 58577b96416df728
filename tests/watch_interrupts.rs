//! Process-wide installation through `watch_interrupts`.

use std::sync::Arc;

use tutl::interrupt::WatcherPhase;
use tutl::InterruptMode;

#[test]
fn test_watch_interrupts_installs_once() {
    std::env::remove_var("TUTL_INTERRUPT_MODE");

    let (registry, watcher) = tutl::watch_interrupts().unwrap();
    assert_eq!(watcher.phase(), WatcherPhase::Waiting);
    assert_eq!(watcher.mode(), InterruptMode::Fatal);

    let (again_registry, again_watcher) = tutl::watch_interrupts().unwrap();
    assert!(Arc::ptr_eq(&registry, &again_registry));
    assert!(Arc::ptr_eq(&watcher, &again_watcher));

    registry.register(|| {});
    assert_eq!(watcher.registry().len(), 1);
}
