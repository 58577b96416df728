//! Interrupt handling for test binaries and tools.
//!
//! Register cleanup handlers from anywhere, start a watcher once (or many
//! times), and on Ctrl-C get your handlers run newest first followed by
//! either a one-line notice or a dump of every thread.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tutl::{InterruptConfig, InterruptMode, InterruptRegistry, InterruptWatcher};
//!
//! # async fn demo() -> std::io::Result<()> {
//! let registry = Arc::new(InterruptRegistry::new());
//! let watcher = Arc::new(InterruptWatcher::new(Arc::clone(&registry), InterruptConfig::default()));
//! watcher.spawn(InterruptMode::Fatal)?;
//! watcher.armed().await;
//!
//! let _flush = registry.register_guard(|| eprintln!("flushing logs"));
//! # Ok(())
//! # }
//! ```
//!
//! A test binary that only wants stack dumps when a hung run is
//! interrupted can make one call instead:
//!
//! ```no_run
//! let (_registry, _watcher) = tutl::watch_interrupts()?;
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod interrupt;
pub mod lifecycle;
pub mod observability;

pub use config::InterruptConfig;
pub use interrupt::{InterruptError, InterruptMode, InterruptRegistry, InterruptWatcher};
pub use lifecycle::{watch_interrupts, CleanupGuard};
