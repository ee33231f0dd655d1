//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → env.rs (PORT / NODE_ENV / DB_* overrides)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so a containerized deploy can run on env vars alone
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ServiceConfig;

use std::path::Path;

/// Resolve the effective configuration for this process.
///
/// Loads `CONFIG_FILE` (or `portfolio.toml` beside the binary) when present,
/// otherwise starts from defaults, then applies environment overrides and
/// re-validates the result.
pub fn resolve() -> Result<ServiceConfig, ConfigError> {
    let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "portfolio.toml".to_string());

    let mut config = if Path::new(&path).exists() {
        let config = load_config(Path::new(&path))?;
        tracing::info!(path = %path, "Configuration file loaded");
        config
    } else {
        ServiceConfig::default()
    };

    env::from_process_env(&mut config);
    validation::validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
