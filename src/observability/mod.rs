//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! interrupt, config, diagnostics
//!     → tracing events (structured fields)
//!     → logging.rs subscriber (stderr)
//! ```
//!
//! # Design Decisions
//! - Libraries only emit events; binaries install the subscriber
//! - Quiet by default so interrupt output stays readable

pub mod logging;

pub use logging::init_logging;
