//! Interrupt handling subsystem.
//!
//! # Data Flow
//! ```text
//! Any thread:
//!     register(f) → registry.rs (append under lock) → returns f
//!
//! Entry point / test setup:
//!     start(mode) → watcher.rs (merge mode, first caller subscribes)
//!                 → source.rs (SIGINT or manual trigger)
//!
//! On interrupt:
//!     watcher.rs → snapshot registry newest first → run handlers
//!                → Quiet: "Interrupted." + exit 1
//!                → Fatal: "panic: Interrupted" + stack dump + exit 2
//! ```
//!
//! # Design Decisions
//! - Registry and watcher are explicit objects shared via Arc, not globals
//! - Mode requests merge upgrade-only: fatal beats quiet regardless of order
//! - One subscription per watcher; duplicate starts are no-ops

pub mod error;
pub mod mode;
pub mod registry;
pub mod source;
pub mod watcher;

pub use error::InterruptError;
pub use mode::InterruptMode;
pub use registry::{Handler, InterruptRegistry};
pub use source::{manual, InterruptSource, InterruptTrigger, ManualSource, SignalSource};
pub use watcher::{InterruptWatcher, WatcherPhase};
