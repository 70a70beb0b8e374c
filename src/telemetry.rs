//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Logging setup
//!
//! The library only emits `tracing` events. Binaries and tests that want to
//! see them can install a formatter here.

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::BfGuardError;

/// Environment variable consulted by [`init_tracing_from_env`].
pub const LOG_ENV_VAR: &str = "BFGUARD_LOG";

/// Install a global fmt subscriber with the given filter directives,
/// e.g. `"bfguard=debug"`.
///
/// Fails if the directives are invalid or a subscriber is already set.
pub fn init_tracing(filter: &str) -> Result<(), BfGuardError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| BfGuardError::ConfigError(format!("invalid log filter '{}': {}", filter, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| BfGuardError::ConfigError(format!("tracing already initialized: {}", e)))?;

    info!("Tracing initialized");
    Ok(())
}

/// Like [`init_tracing`], reading directives from `BFGUARD_LOG` and falling
/// back to `default_filter`.
pub fn init_tracing_from_env(default_filter: &str) -> Result<(), BfGuardError> {
    let filter = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| default_filter.to_string());
    init_tracing(&filter)
}
