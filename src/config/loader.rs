//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::InterruptConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides the configured mode.
pub const MODE_ENV_VAR: &str = "TUTL_INTERRUPT_MODE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InterruptConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<InterruptConfig, ConfigError> {
    let config: InterruptConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut InterruptConfig) -> Result<(), ConfigError> {
    apply_overrides(config, |var| std::env::var(var).ok())
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides<F>(config: &mut InterruptConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(MODE_ENV_VAR) {
        config.mode = value.parse().map_err(|reason| ConfigError::Env {
            var: MODE_ENV_VAR,
            reason,
        })?;
        tracing::debug!(mode = %config.mode, "Interrupt mode overridden from environment");
    }
    Ok(())
}
