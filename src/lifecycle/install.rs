//! Process-wide interrupt handling in one call.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{const_mutex, Mutex};

use crate::config::{apply_env_overrides, InterruptConfig};
use crate::interrupt::{InterruptRegistry, InterruptSource, InterruptWatcher, SignalSource, WatcherPhase};

type Installed = (Arc<InterruptRegistry>, Arc<InterruptWatcher>);

static INSTALLED: Mutex<Option<Installed>> = const_mutex(None);

/// Make Ctrl-C run the registered handlers and then dump every thread's
/// stack, for the whole process.
///
/// Meant for test binaries that may hang: call it once near the start and
/// interrupt a stuck run to see where it is stuck. The configuration is the
/// default one plus environment overrides, so `TUTL_INTERRUPT_MODE=quiet`
/// turns the dump into a one-line notice. The watcher runs on its own
/// thread, so no runtime is needed.
///
/// Returns once the signal subscription is installed. Later calls return
/// the same registry and watcher.
pub fn watch_interrupts() -> io::Result<Installed> {
    let mut installed = INSTALLED.lock();
    if let Some((registry, watcher)) = installed.as_ref() {
        return Ok((Arc::clone(registry), Arc::clone(watcher)));
    }

    let mut config = InterruptConfig::default();
    apply_env_overrides(&mut config).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let (registry, watcher) = install(config, SignalSource)?;
    *installed = Some((Arc::clone(&registry), Arc::clone(&watcher)));
    Ok((registry, watcher))
}

fn install<S>(config: InterruptConfig, source: S) -> io::Result<Installed>
where
    S: InterruptSource,
{
    let mode = config.mode;
    let registry = Arc::new(InterruptRegistry::new());
    let watcher = Arc::new(InterruptWatcher::with_source(Arc::clone(&registry), config, source));

    let handle = watcher.spawn_thread(mode)?;
    // Polled so this works from inside or outside a runtime.
    while watcher.phase() == WatcherPhase::Idle {
        if handle.as_ref().map_or(true, |h| h.is_finished()) {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    match watcher.phase() {
        WatcherPhase::Idle | WatcherPhase::Disabled => Err(io::Error::other(
            "failed to subscribe to interrupt signal",
        )),
        _ => Ok((registry, watcher)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::{manual, InterruptMode};
    use crate::interrupt::source::Interrupted;

    #[test]
    fn test_install_returns_armed_watcher() {
        let (_trigger, source) = manual();
        let config = InterruptConfig {
            mode: InterruptMode::Quiet,
            ..InterruptConfig::default()
        };

        let (registry, watcher) = install(config, source).unwrap();
        assert_eq!(watcher.phase(), WatcherPhase::Waiting);
        assert_eq!(watcher.mode(), InterruptMode::Quiet);
        assert!(Arc::ptr_eq(&registry, watcher.registry()));

        // Later start requests only merge their mode.
        assert!(watcher.spawn_thread(InterruptMode::Fatal).unwrap().is_none());
        assert_eq!(watcher.mode(), InterruptMode::Fatal);
    }

    struct Unsupported;

    impl InterruptSource for Unsupported {
        fn subscribe(self: Box<Self>) -> io::Result<Interrupted> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "no signals here"))
        }
    }

    #[test]
    fn test_install_reports_subscribe_failure() {
        let err = install(InterruptConfig::default(), Unsupported).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
