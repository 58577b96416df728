//! Interrupt notification sources.
//!
//! # Responsibilities
//! - Subscribe to exactly one external interrupt notification
//! - Resolve a future when that notification arrives
//!
//! # Design Decisions
//! - `subscribe` installs the OS listener synchronously so the watcher can
//!   report itself armed before it suspends
//! - A source that can never fire (closed stream, dropped trigger) pends
//!   forever instead of reporting a spurious interrupt

use std::io;

use futures_util::future::{self, BoxFuture};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Future that resolves once the interrupt has been delivered.
pub type Interrupted = BoxFuture<'static, ()>;

/// A one-shot source of interrupt notifications.
pub trait InterruptSource: Send + 'static {
    /// Install the subscription and return the future that waits on it.
    ///
    /// Called at most once, from inside a Tokio runtime.
    fn subscribe(self: Box<Self>) -> io::Result<Interrupted>;
}

/// The terminal interrupt signal (SIGINT / Ctrl-C).
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalSource;

#[cfg(unix)]
impl InterruptSource for SignalSource {
    fn subscribe(self: Box<Self>) -> io::Result<Interrupted> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        Ok(Box::pin(async move {
            if sigint.recv().await.is_none() {
                future::pending::<()>().await;
            }
        }))
    }
}

#[cfg(not(unix))]
impl InterruptSource for SignalSource {
    fn subscribe(self: Box<Self>) -> io::Result<Interrupted> {
        Ok(Box::pin(async {
            if tokio::signal::ctrl_c().await.is_err() {
                future::pending::<()>().await;
            }
        }))
    }
}

/// Create a programmatic interrupt: firing the trigger resolves the source.
pub fn manual() -> (InterruptTrigger, ManualSource) {
    let (tx, rx) = oneshot::channel();
    (
        InterruptTrigger {
            tx: Mutex::new(Some(tx)),
        },
        ManualSource { rx },
    )
}

/// Receiving half of [`manual`].
#[derive(Debug)]
pub struct ManualSource {
    rx: oneshot::Receiver<()>,
}

impl InterruptSource for ManualSource {
    fn subscribe(self: Box<Self>) -> io::Result<Interrupted> {
        let rx = self.rx;
        Ok(Box::pin(async move {
            if rx.await.is_err() {
                future::pending::<()>().await;
            }
        }))
    }
}

/// Sending half of [`manual`].
#[derive(Debug)]
pub struct InterruptTrigger {
    tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl InterruptTrigger {
    /// Deliver the interrupt. Returns `false` if it was already fired or
    /// the source is gone.
    pub fn fire(&self) -> bool {
        match self.tx.lock().take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_fires_once() {
        let (trigger, source) = manual();
        let interrupted = Box::new(source).subscribe().unwrap();

        assert!(trigger.fire());
        assert!(!trigger.fire());
        tokio::time::timeout(Duration::from_secs(1), interrupted)
            .await
            .expect("manual interrupt should resolve");
    }

    #[tokio::test]
    async fn test_dropped_trigger_never_fires() {
        let (trigger, source) = manual();
        let interrupted = Box::new(source).subscribe().unwrap();
        drop(trigger);

        let res = tokio::time::timeout(Duration::from_millis(50), interrupted).await;
        assert!(res.is_err(), "dropped trigger must not look like an interrupt");
    }
}
