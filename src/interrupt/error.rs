//! Interrupt outcomes and failures.

use thiserror::Error;

use crate::diagnostics::StackDump;

/// How a watch ended.
///
/// `Quiet` and `Fatal` are the two terminal outcomes of a delivered
/// interrupt. Nothing between the watcher and the process entry point should
/// swallow them; hand them to [`crate::lifecycle::exit::terminate`].
#[derive(Debug, Error)]
pub enum InterruptError {
    /// Interrupted in quiet mode.
    #[error("Interrupted.")]
    Quiet,

    /// Interrupted in fatal mode, carrying the stack dump.
    #[error("Interrupted")]
    Fatal(StackDump),

    /// The interrupt signal could not be subscribed to.
    #[error("failed to subscribe to interrupt signal: {0}")]
    Subscribe(#[from] std::io::Error),
}

impl InterruptError {
    /// Whether this is one of the two interrupt outcomes, as opposed to a
    /// setup failure.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, InterruptError::Quiet | InterruptError::Fatal(_))
    }

    pub fn stack_dump(&self) -> Option<&StackDump> {
        match self {
            InterruptError::Fatal(dump) => Some(dump),
            _ => None,
        }
    }
}
