//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (exit statuses fit in a process status byte)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InterruptConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::InterruptConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between 1 and 255, got {value}")]
    ExitCodeOutOfRange { field: &'static str, value: i32 },

    #[error("exit.quiet_code and exit.fatal_code must differ (both {0})")]
    ExitCodesEqual(i32),
}

/// Check a parsed configuration.
pub fn validate_config(config: &InterruptConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("exit.quiet_code", config.exit.quiet_code),
        ("exit.fatal_code", config.exit.fatal_code),
    ] {
        if !(1..=255).contains(&value) {
            errors.push(ValidationError::ExitCodeOutOfRange { field, value });
        }
    }

    if config.exit.quiet_code == config.exit.fatal_code {
        errors.push(ValidationError::ExitCodesEqual(config.exit.quiet_code));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
