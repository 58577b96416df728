//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::interrupt::InterruptMode;

/// Root configuration for interrupt handling.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InterruptConfig {
    /// Mode requested by entry points that start the watcher from config.
    pub mode: InterruptMode,

    /// Exit statuses.
    pub exit: ExitConfig,

    /// Fatal-mode diagnostics.
    pub diagnostics: DiagnosticsConfig,
}

/// Process exit statuses used after an interrupt.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExitConfig {
    /// Status after a quiet interrupt.
    pub quiet_code: i32,

    /// Status after a fatal interrupt.
    pub fatal_code: i32,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            quiet_code: 1,
            fatal_code: 2,
        }
    }
}

/// What a fatal interrupt reports.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Describe every OS thread, not just the watcher's own stack.
    pub list_threads: bool,

    /// Interrupt sleeping threads with a signal to collect their frames.
    /// Only used on Linux, and only together with `list_threads`.
    pub sample_threads: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            list_threads: true,
            sample_threads: true,
        }
    }
}
