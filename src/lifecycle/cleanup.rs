//! Scope-exit cleanup for registered interrupt handlers.

use crate::interrupt::Handler;

/// Runs a registered interrupt handler when dropped.
///
/// The same handler stays registered with the watcher, so the cleanup runs
/// either at scope exit or on interrupt, whichever comes first for the
/// process.
#[must_use = "the cleanup runs when the guard is dropped"]
pub struct CleanupGuard {
    handler: Handler,
}

impl CleanupGuard {
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }

    /// The shared handler this guard will run.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        (self.handler)();
    }
}

impl std::fmt::Debug for CleanupGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_runs_once_on_drop() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let guard = CleanupGuard::new(Arc::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        let shared = Arc::clone(guard.handler());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // The handle outlives the guard.
        shared();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
