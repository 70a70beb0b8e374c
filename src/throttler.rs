//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Bruteforce throttler
//!
//! Policy layer over an [`AttemptBackend`]: records failed attempts per
//! subnet and turns the recent attempt count into an exponential delay.
//!
//! ```text
//! attempts   0    1    2    3  ...   7      8+     >max_attempts
//! delay(ms)  0  200  400  800  ... 12800  25000        25000
//! ```

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::attempts::{AttemptBackend, Metadata};
use crate::cache_backend::CacheBackend;
use crate::clock::{Clock, SystemClock};
use crate::config::{BackendKind, ThrottlerConfig};
use crate::constants::{FIRST_DELAY_MS, LOCKOUT_WINDOW_HOURS, MAX_AGE_HOURS_CAP};
use crate::database_backend::DatabaseBackend;
use crate::error::BfGuardError;
use crate::ip_address::{IpAddress, IpRange};
use crate::storage::{MemoryAttemptTable, MemoryStorage};

/// Subnet-keyed attempt throttler
pub struct Throttler {
    backend: Arc<dyn AttemptBackend>,
    clock: Arc<dyn Clock>,
    config: ThrottlerConfig,
    allowlist: Vec<IpRange>,
}

impl Throttler {
    /// Create a throttler on the system clock.
    pub fn new(
        backend: Arc<dyn AttemptBackend>,
        config: ThrottlerConfig,
    ) -> Result<Self, BfGuardError> {
        Self::with_clock(backend, Arc::new(SystemClock), config)
    }

    /// Create a throttler reading time from `clock`.
    pub fn with_clock(
        backend: Arc<dyn AttemptBackend>,
        clock: Arc<dyn Clock>,
        config: ThrottlerConfig,
    ) -> Result<Self, BfGuardError> {
        config.validate()?;
        let allowlist = config.allowlist_ranges()?;
        Ok(Self {
            backend,
            clock,
            config,
            allowlist,
        })
    }

    /// Create a throttler over in-process storage for the configured backend.
    pub fn in_memory(config: ThrottlerConfig, clock: Arc<dyn Clock>) -> Result<Self, BfGuardError> {
        let backend: Arc<dyn AttemptBackend> = match config.backend {
            BackendKind::Database => Arc::new(DatabaseBackend::new(
                Arc::new(MemoryAttemptTable::new()),
                clock.clone(),
            )),
            BackendKind::Cache => Arc::new(CacheBackend::new(
                Arc::new(MemoryStorage::with_clock(clock.clone())),
                clock.clone(),
            )),
        };
        Self::with_clock(backend, clock, config)
    }

    /// Active configuration.
    pub fn config(&self) -> &ThrottlerConfig {
        &self.config
    }

    fn subnet(&self, ip: &IpAddress) -> String {
        ip.subnet_with(self.config.ipv4_prefix, self.config.ipv6_prefix)
    }

    /// Record a failed attempt for `action` from `ip`.
    pub async fn register_attempt(
        &self,
        action: &str,
        ip: &str,
        metadata: &Metadata,
    ) -> Result<(), BfGuardError> {
        if !self.config.enabled {
            return Ok(());
        }

        let address = IpAddress::parse(ip)?;
        if self.is_allowlisted(&address) {
            return Ok(());
        }

        info!(
            "Bruteforce attempt from \"{}\" detected for action \"{}\"",
            address, action
        );

        self.backend
            .register_attempt(
                &address.to_string(),
                &self.subnet(&address),
                self.clock.now(),
                action,
                metadata,
            )
            .await?;
        Ok(())
    }

    /// Whether `ip` is exempt from throttling.
    ///
    /// Everything is exempt while protection is disabled. Unparsable
    /// addresses are never exempt.
    pub fn is_bypass_listed(&self, ip: &str) -> bool {
        if !self.config.enabled {
            return true;
        }
        IpAddress::parse(ip)
            .map(|address| self.is_allowlisted(&address))
            .unwrap_or(false)
    }

    fn is_allowlisted(&self, ip: &IpAddress) -> bool {
        self.allowlist.iter().any(|range| range.contains(ip))
    }

    /// Attempts from `ip` for `action` in the last `max_age_hours`.
    ///
    /// An empty action counts every action. Windows above 48 hours are capped.
    pub async fn get_attempts(
        &self,
        ip: &str,
        action: &str,
        max_age_hours: f64,
    ) -> Result<u64, BfGuardError> {
        let max_age_hours = if max_age_hours > MAX_AGE_HOURS_CAP {
            warn!(
                "max_age_hours {} exceeds {}, capping",
                max_age_hours, MAX_AGE_HOURS_CAP
            );
            MAX_AGE_HOURS_CAP
        } else {
            max_age_hours
        };

        if ip.is_empty() || self.is_bypass_listed(ip) {
            return Ok(0);
        }

        let address = IpAddress::parse(ip)?;
        let cutoff = self.clock.now() - (3600.0 * max_age_hours) as i64;
        let action = (!action.is_empty()).then_some(action);

        let attempts = self
            .backend
            .get_attempts(&self.subnet(&address), cutoff, action, None)
            .await?;
        Ok(attempts)
    }

    /// Delay in milliseconds for a given attempt count.
    pub fn calculate_delay(&self, attempts: u64) -> u64 {
        if attempts == 0 {
            return 0;
        }
        if attempts > self.config.max_attempts {
            return self.config.max_delay_ms;
        }

        u32::try_from(attempts)
            .ok()
            .and_then(|n| 1u64.checked_shl(n))
            .and_then(|factor| FIRST_DELAY_MS.checked_mul(factor))
            .map_or(self.config.max_delay_ms, |delay| {
                delay.min(self.config.max_delay_ms)
            })
    }

    /// Delay in milliseconds `ip` should wait before attempting `action`.
    pub async fn get_delay(&self, ip: &str, action: &str) -> Result<u64, BfGuardError> {
        let attempts = self
            .get_attempts(ip, action, f64::from(self.config.retention_hours))
            .await?;
        Ok(self.calculate_delay(attempts))
    }

    /// Forget attempts of `ip` for `action`, optionally only matching `metadata`.
    pub async fn reset_delay(
        &self,
        ip: &str,
        action: &str,
        metadata: Option<&Metadata>,
    ) -> Result<(), BfGuardError> {
        if ip.is_empty() {
            return Ok(());
        }
        let address = IpAddress::parse(ip)?;
        let subnet = self.subnet(&address);
        debug!("Resetting delay: subnet={}, action={}", subnet, action);
        self.backend
            .reset_attempts(&subnet, Some(action), metadata)
            .await?;
        Ok(())
    }

    /// Forget every attempt of `ip`.
    pub async fn reset_delay_for_ip(&self, ip: &str) -> Result<(), BfGuardError> {
        if ip.is_empty() {
            return Ok(());
        }
        let address = IpAddress::parse(ip)?;
        let subnet = self.subnet(&address);
        debug!("Resetting all delays: subnet={}", subnet);
        self.backend.reset_attempts(&subnet, None, None).await?;
        Ok(())
    }

    /// Sleep for the current delay and return it in milliseconds.
    ///
    /// In testing mode the delay is computed but not slept.
    pub async fn sleep_delay(&self, ip: &str, action: &str) -> Result<u64, BfGuardError> {
        let delay = self.get_delay(ip, action).await?;
        if delay > 0 && !self.config.testing {
            debug!("Delaying {} for {} ms", ip, delay);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        Ok(delay)
    }

    /// Like [`sleep_delay`](Self::sleep_delay), but refuses outright once the
    /// recent attempt count exceeds `max_attempts`.
    pub async fn sleep_delay_or_throw_on_max(
        &self,
        ip: &str,
        action: &str,
    ) -> Result<u64, BfGuardError> {
        let attempts = self.get_attempts(ip, action, LOCKOUT_WINDOW_HOURS).await?;
        if attempts > self.config.max_attempts {
            warn!(
                "Maximum delay reached for {}: {} attempts for action \"{}\"",
                ip, attempts, action
            );
            return Err(BfGuardError::MaxDelayReached {
                action: action.to_string(),
                attempts,
            });
        }
        self.sleep_delay(ip, action).await
    }
}
