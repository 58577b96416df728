//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Keep stdout free for the program's own output
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level from `RUST_LOG`, falling back to the caller's default
//! - Output goes to stderr

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        // Either this test or another one installed it first.
        init_logging("warn");
        assert!(!init_logging("debug"));
    }
}
