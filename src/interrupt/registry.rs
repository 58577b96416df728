//! Interrupt handler registry.
//!
//! # Responsibilities
//! - Accumulate cleanup/diagnostic callbacks from any thread
//! - Hand the watcher a newest-first snapshot when an interrupt arrives
//!
//! # Design Decisions
//! - Append-only: handles are returned for the caller's own reuse, not for
//!   unregistering
//! - The lock is held only to push or copy, never while a handler runs

use std::sync::Arc;

use parking_lot::Mutex;

use crate::lifecycle::cleanup::CleanupGuard;

/// A registered interrupt handler.
pub type Handler = Arc<dyn Fn() + Send + Sync + 'static>;

/// Ordered, thread-safe collection of interrupt handlers.
#[derive(Default)]
pub struct InterruptRegistry {
    handlers: Mutex<Vec<Handler>>,
}

impl InterruptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure to run when the process is interrupted.
    ///
    /// The returned handle is the registered handler itself, so it can also
    /// be called directly as an ordinary cleanup step.
    pub fn register<F>(&self, f: F) -> Handler
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register_handler(Arc::new(f))
    }

    /// Register an existing handle. Registering the same handle twice makes
    /// it run twice.
    pub fn register_handler(&self, handler: Handler) -> Handler {
        self.handlers.lock().push(Arc::clone(&handler));
        handler
    }

    /// Register a closure and return a guard that also runs it on drop.
    ///
    /// ```
    /// # use tutl::InterruptRegistry;
    /// let registry = InterruptRegistry::new();
    /// {
    ///     let _flush = registry.register_guard(|| println!("flushed"));
    ///     // ... work that may be interrupted ...
    /// } // "flushed" printed here if no interrupt happened
    /// ```
    pub fn register_guard<F>(&self, f: F) -> CleanupGuard
    where
        F: Fn() + Send + Sync + 'static,
    {
        CleanupGuard::new(self.register(f))
    }

    /// Number of registrations so far.
    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.lock().is_empty()
    }

    /// Copy of the current handlers, last registered first.
    pub fn snapshot_reversed(&self) -> Vec<Handler> {
        let handlers = self.handlers.lock();
        handlers.iter().rev().cloned().collect()
    }
}

impl std::fmt::Debug for InterruptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptRegistry")
            .field("handlers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl Fn() + Send + Sync {
        let log = Arc::clone(log);
        move || log.lock().push(name)
    }

    #[test]
    fn test_snapshot_is_newest_first() {
        let registry = InterruptRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(recorder(&log, "A"));
        registry.register(recorder(&log, "B"));
        registry.register(recorder(&log, "C"));

        for handler in registry.snapshot_reversed() {
            handler();
        }
        assert_eq!(*log.lock(), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_register_returns_same_handle() {
        let registry = InterruptRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let handle = registry.register(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let snapshot = registry.snapshot_reversed();
        assert!(Arc::ptr_eq(&handle, &snapshot[0]));

        handle();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_handle_twice_runs_twice() {
        let registry = InterruptRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let twice = registry.register(recorder(&log, "twice"));
        registry.register(recorder(&log, "middle"));
        registry.register_handler(twice);

        assert_eq!(registry.len(), 3);
        for handler in registry.snapshot_reversed() {
            handler();
        }
        assert_eq!(*log.lock(), vec!["twice", "middle", "twice"]);
    }

    #[test]
    fn test_snapshot_does_not_drain() {
        let registry = InterruptRegistry::new();
        assert!(registry.is_empty());
        registry.register(|| {});
        assert_eq!(registry.snapshot_reversed().len(), 1);
        assert_eq!(registry.snapshot_reversed().len(), 1);
    }

    #[test]
    fn test_guard_runs_registered_handler_on_drop() {
        let registry = InterruptRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        {
            let _guard = registry.register_guard(move || {
                h.fetch_add(1, Ordering::SeqCst);
            });
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // Still registered for the interrupt path.
        assert_eq!(registry.len(), 1);
    }
}
