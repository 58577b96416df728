//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Cleanup (cleanup.rs):
//!     register_guard → scope exit → handler runs
//!
//! Install (install.rs):
//!     watch_interrupts → env-resolved config → watcher thread → armed
//!
//! Exit (exit.rs):
//!     Watcher outcome → render to stderr → exit(quiet | fatal status)
//! ```
//!
//! # Design Decisions
//! - Exit statuses come from configuration (1 quiet, 2 fatal by default)
//! - Termination is unconditional once an interrupt has been drained

pub mod cleanup;
pub mod exit;
pub mod install;

pub use cleanup::CleanupGuard;
pub use install::watch_interrupts;
