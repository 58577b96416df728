//! Diagnostics subsystem.
//!
//! # Data Flow
//! ```text
//! Fatal interrupt:
//!     → threads.rs (enumerate OS threads, state, wait channel)
//!     → sampler.rs (signal sleeping threads for their own backtraces)
//!     → stack_dump.rs (capturing thread first, then every other thread)
//!     → lifecycle::exit (rendered to stderr)
//! ```
//!
//! # Design Decisions
//! - A thread can only walk its own stack, so other threads are asked to
//!   do it from a signal handler; running threads are never interrupted
//! - Threads that cannot be sampled fall back to what the OS reports
//! - Enumeration failures degrade to the current thread alone

#[cfg(target_os = "linux")]
pub mod sampler;
pub mod stack_dump;
pub mod threads;

pub use stack_dump::{StackDump, ThreadStack};
pub use threads::{ThreadInfo, ThreadState};
