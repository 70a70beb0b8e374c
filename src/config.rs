//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Configuration module
//!
//! Throttler settings, loadable from YAML or TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_IPV4_PREFIX, DEFAULT_IPV6_PREFIX, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS,
    DEFAULT_RETENTION_HOURS, FIRST_DELAY_MS,
};
use crate::error::BfGuardError;
use crate::ip_address::IpRange;

/// Attempt backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Relational table, one row per attempt
    #[default]
    Database,
    /// Distributed cache, one packed list per subnet
    Cache,
}

/// Throttler configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThrottlerConfig {
    /// Master switch; when off nothing is recorded or delayed
    pub enabled: bool,
    /// Compute delays without sleeping
    pub testing: bool,
    /// Addresses and CIDR blocks exempt from throttling
    pub allowlist: Vec<String>,
    /// Attempts after which the maximum delay applies
    pub max_attempts: u64,
    /// Upper bound for a single delay in milliseconds
    pub max_delay_ms: u64,
    /// Attempt horizon used for delays
    pub retention_hours: u32,
    /// Prefix length for IPv4 subnets
    pub ipv4_prefix: u8,
    /// Prefix length for IPv6 subnets
    pub ipv6_prefix: u8,
    /// Attempt backend
    pub backend: BackendKind,
}

impl Default for ThrottlerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            testing: false,
            allowlist: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            retention_hours: DEFAULT_RETENTION_HOURS,
            ipv4_prefix: DEFAULT_IPV4_PREFIX,
            ipv6_prefix: DEFAULT_IPV6_PREFIX,
            backend: BackendKind::Database,
        }
    }
}

impl ThrottlerConfig {
    /// Parse from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BfGuardError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, BfGuardError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.yaml`, `.yml` or `.toml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BfGuardError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(BfGuardError::ConfigError(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Check value ranges and allowlist syntax.
    pub fn validate(&self) -> Result<(), BfGuardError> {
        if self.max_attempts == 0 {
            return Err(BfGuardError::ConfigError(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.max_delay_ms < FIRST_DELAY_MS {
            return Err(BfGuardError::ConfigError(format!(
                "max_delay_ms must be at least {}",
                FIRST_DELAY_MS
            )));
        }

        if self.retention_hours == 0 {
            return Err(BfGuardError::ConfigError(
                "retention_hours must be greater than 0".to_string(),
            ));
        }

        if self.ipv4_prefix > 32 {
            return Err(BfGuardError::ConfigError(format!(
                "ipv4_prefix cannot exceed 32: {}",
                self.ipv4_prefix
            )));
        }

        if self.ipv6_prefix > 128 {
            return Err(BfGuardError::ConfigError(format!(
                "ipv6_prefix cannot exceed 128: {}",
                self.ipv6_prefix
            )));
        }

        self.allowlist_ranges().map(|_| ())
    }

    /// Parsed allowlist.
    pub fn allowlist_ranges(&self) -> Result<Vec<IpRange>, BfGuardError> {
        self.allowlist
            .iter()
            .map(|entry| {
                entry.parse::<IpRange>().map_err(|e| {
                    BfGuardError::ConfigError(format!("invalid allowlist entry '{}': {}", entry, e))
                })
            })
            .collect()
    }
}
