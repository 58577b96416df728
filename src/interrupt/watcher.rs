//! Interrupt watcher.
//!
//! # States
//! ```text
//! Idle → Waiting:     first start() installs the signal subscription
//! Waiting → Draining: interrupt delivered, handlers run newest first
//! Draining → QuietExit | FatalExit: decided by the merged mode
//! Idle → Disabled:    subscribing failed; never retried
//! ```
//!
//! # Design Decisions
//! - Only the first caller subscribes; later callers only merge their mode
//! - The mode is read after draining, so a fatal request made by a handler
//!   or a racing start() still wins
//! - Handler panics are not caught; they abort draining and termination

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::InterruptConfig;
use crate::diagnostics::StackDump;
use crate::interrupt::error::InterruptError;
use crate::interrupt::mode::InterruptMode;
use crate::interrupt::registry::InterruptRegistry;
use crate::interrupt::source::{InterruptSource, SignalSource};
use crate::lifecycle::exit;

/// Observable state of the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherPhase {
    /// No watch has installed its subscription yet.
    Idle,
    /// Suspended until the interrupt arrives.
    Waiting,
    /// Running handlers.
    Draining,
    QuietExit,
    FatalExit,
    /// The subscription could not be installed.
    Disabled,
}

struct WatcherState {
    activated: bool,
    mode: InterruptMode,
    source: Option<Box<dyn InterruptSource>>,
}

/// Waits for one interrupt, drains the registry, then ends the process.
pub struct InterruptWatcher {
    registry: Arc<InterruptRegistry>,
    config: InterruptConfig,
    state: Mutex<WatcherState>,
    phase: watch::Sender<WatcherPhase>,
}

impl InterruptWatcher {
    /// Create a watcher for the terminal interrupt signal.
    pub fn new(registry: Arc<InterruptRegistry>, config: InterruptConfig) -> Self {
        Self::with_source(registry, config, SignalSource)
    }

    /// Create a watcher for another interrupt source.
    pub fn with_source<S>(registry: Arc<InterruptRegistry>, config: InterruptConfig, source: S) -> Self
    where
        S: InterruptSource,
    {
        let (phase, _) = watch::channel(WatcherPhase::Idle);
        Self {
            registry,
            config,
            state: Mutex::new(WatcherState {
                activated: false,
                // Lowest mode; every start() merges its request into it.
                mode: InterruptMode::Quiet,
                source: Some(Box::new(source)),
            }),
            phase,
        }
    }

    pub fn registry(&self) -> &Arc<InterruptRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &InterruptConfig {
        &self.config
    }

    /// Mode merged from all requests so far.
    pub fn mode(&self) -> InterruptMode {
        self.state.lock().mode
    }

    pub fn phase(&self) -> WatcherPhase {
        *self.phase.borrow()
    }

    /// Resolves once the interrupt subscription is installed, or once
    /// installing it has failed. Returns `false` in the latter case.
    pub async fn armed(&self) -> bool {
        self.wait_for_phase(|p| p != WatcherPhase::Idle).await;
        self.phase() != WatcherPhase::Disabled
    }

    /// Resolves once the phase satisfies `pred`.
    pub async fn wait_for_phase<F>(&self, pred: F)
    where
        F: Fn(WatcherPhase) -> bool,
    {
        let mut rx = self.phase.subscribe();
        // The sender lives in self, so the channel cannot close here.
        let _ = rx.wait_for(|p| pred(*p)).await;
    }

    /// Wait for the interrupt, run handlers newest first, and report the
    /// outcome.
    ///
    /// Returns `Ok(())` straight away if another caller already owns the
    /// wait; `mode` is still merged in. Otherwise this only returns once an
    /// interrupt has been handled, with [`InterruptError::Quiet`] or
    /// [`InterruptError::Fatal`], or if subscribing failed.
    pub async fn watch(&self, mode: InterruptMode) -> Result<(), InterruptError> {
        match self.activate(mode) {
            Some(source) => self.run(source).await,
            None => Ok(()),
        }
    }

    /// [`watch`](Self::watch), then terminate the process with the outcome.
    pub async fn start(&self, mode: InterruptMode) {
        let result = self.watch(mode).await;
        self.conclude(result);
    }

    /// Start watching on a Tokio task.
    ///
    /// The mode is merged before this returns. Returns `Ok(None)` if another
    /// caller already owns the wait, and an error without claiming the wait
    /// when called outside a Tokio runtime.
    pub fn spawn(
        self: &Arc<Self>,
        mode: InterruptMode,
    ) -> std::io::Result<Option<tokio::task::JoinHandle<()>>> {
        let runtime = tokio::runtime::Handle::try_current().map_err(std::io::Error::other)?;
        let Some(source) = self.activate(mode) else {
            return Ok(None);
        };
        let watcher = Arc::clone(self);
        Ok(Some(runtime.spawn(async move {
            let result = watcher.run(source).await;
            watcher.conclude(result);
        })))
    }

    /// Start watching on a dedicated thread with its own runtime, for
    /// callers outside any Tokio runtime.
    ///
    /// Returns `Ok(None)` if another caller already owns the wait.
    pub fn spawn_thread(
        self: &Arc<Self>,
        mode: InterruptMode,
    ) -> std::io::Result<Option<std::thread::JoinHandle<()>>> {
        let Some(source) = self.activate(mode) else {
            return Ok(None);
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let watcher = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("interrupt-watcher".into())
            .spawn(move || {
                let result = runtime.block_on(watcher.run(source));
                watcher.conclude(result);
            })?;
        Ok(Some(handle))
    }

    fn conclude(&self, result: Result<(), InterruptError>) {
        match result {
            Ok(()) => {}
            Err(e @ InterruptError::Subscribe(_)) => {
                tracing::error!(error = %e, "Interrupt watcher disabled");
            }
            Err(e) => exit::terminate(&e, &self.config.exit),
        }
    }

    /// Merge `mode` and claim the subscription if nobody has yet.
    fn activate(&self, mode: InterruptMode) -> Option<Box<dyn InterruptSource>> {
        let mut state = self.state.lock();
        state.mode = state.mode.merge(mode);
        if state.activated {
            tracing::debug!(requested = %mode, mode = %state.mode, "Interrupt watcher already active");
            return None;
        }
        state.activated = true;
        tracing::debug!(mode = %state.mode, "Interrupt watcher activated");
        state.source.take()
    }

    async fn run(&self, source: Box<dyn InterruptSource>) -> Result<(), InterruptError> {
        let interrupted = match source.subscribe() {
            Ok(interrupted) => interrupted,
            Err(e) => {
                self.phase.send_replace(WatcherPhase::Disabled);
                return Err(e.into());
            }
        };
        self.phase.send_replace(WatcherPhase::Waiting);
        tracing::debug!("Waiting for interrupt");

        interrupted.await;

        self.phase.send_replace(WatcherPhase::Draining);
        let handlers = self.registry.snapshot_reversed();
        tracing::info!(handlers = handlers.len(), "Interrupt received, running handlers");
        for handler in &handlers {
            handler();
        }

        match self.mode() {
            InterruptMode::Quiet => {
                self.phase.send_replace(WatcherPhase::QuietExit);
                Err(InterruptError::Quiet)
            }
            InterruptMode::Fatal => {
                self.phase.send_replace(WatcherPhase::FatalExit);
                #[allow(unused_mut)]
                let mut dump = StackDump::capture(&self.config.diagnostics);
                #[cfg(all(tokio_unstable, tokio_taskdump))]
                {
                    dump.tasks = crate::diagnostics::stack_dump::capture_tasks().await;
                }
                tracing::debug!(threads = dump.len(), "Captured stack dump");
                Err(InterruptError::Fatal(dump))
            }
        }
    }
}

impl std::fmt::Debug for InterruptWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptWatcher")
            .field("registry", &self.registry)
            .field("mode", &self.mode())
            .field("phase", &self.phase())
            .finish()
    }
}
