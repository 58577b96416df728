//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → loader.rs (environment overrides)
//!     → InterruptConfig (validated, immutable)
//!     → handed to the InterruptWatcher at construction
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no config file is needed at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{DiagnosticsConfig, ExitConfig, InterruptConfig};
