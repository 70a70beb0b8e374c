//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Storage abstraction layer
//!
//! Two collaborator interfaces sit under the attempt backends:
//!
//! - [`Storage`]: a key-value cache with per-key TTL, used by the
//!   distributed-cache backend.
//! - [`AttemptTable`]: row access to the `bruteforce_attempts` table, used by
//!   the durable backend.
//!
//! In-process implementations of both live here; the Redis and PostgreSQL
//! drivers are feature-gated in their own modules.

use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// Key-value cache interface
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get a value
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a value with an optional TTL in seconds
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), StorageError>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// One persisted attempt row.
///
/// `metadata` holds the already-encoded (and possibly truncated) metadata
/// text exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub ip: String,
    pub subnet: String,
    pub action: String,
    pub metadata: String,
    pub occurred: i64,
}

/// Row filter for counting and deleting attempts.
///
/// All set fields must match. Time bounds are strict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptFilter {
    pub subnet: String,
    pub action: Option<String>,
    pub metadata: Option<String>,
    /// Match rows with `occurred > occurred_after`
    pub occurred_after: Option<i64>,
    /// Match rows with `occurred < occurred_before`
    pub occurred_before: Option<i64>,
}

impl AttemptFilter {
    /// Filter on subnet only.
    pub fn subnet(subnet: impl Into<String>) -> Self {
        Self {
            subnet: subnet.into(),
            ..Default::default()
        }
    }

    /// Restrict to an action.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Restrict to encoded metadata.
    pub fn metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Only rows newer than `timestamp`.
    pub fn occurred_after(mut self, timestamp: i64) -> Self {
        self.occurred_after = Some(timestamp);
        self
    }

    /// Only rows older than `timestamp`.
    pub fn occurred_before(mut self, timestamp: i64) -> Self {
        self.occurred_before = Some(timestamp);
        self
    }

    /// Evaluate the filter against a row.
    pub fn matches(&self, row: &AttemptRow) -> bool {
        row.subnet == self.subnet
            && self.action.as_ref().map_or(true, |a| &row.action == a)
            && self.metadata.as_ref().map_or(true, |m| &row.metadata == m)
            && self.occurred_after.map_or(true, |t| row.occurred > t)
            && self.occurred_before.map_or(true, |t| row.occurred < t)
    }
}

/// Attempt table interface
#[async_trait]
pub trait AttemptTable: Send + Sync {
    /// Append a row
    async fn insert(&self, row: &AttemptRow) -> Result<(), StorageError>;

    /// Count matching rows
    async fn count(&self, filter: &AttemptFilter) -> Result<u64, StorageError>;

    /// Delete matching rows, returning how many were removed
    async fn delete(&self, filter: &AttemptFilter) -> Result<u64, StorageError>;
}

/// In-memory key-value cache.
///
/// TTLs are checked lazily against the injected clock on read.
pub struct MemoryStorage {
    data: dashmap::DashMap<String, CacheEntry, ahash::RandomState>,
    clock: Arc<dyn Clock>,
}

/// Cached value with its absolute expiry (unix seconds).
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<i64>,
}

impl MemoryStorage {
    /// Create an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: dashmap::DashMap::with_hasher(ahash::RandomState::new()),
            clock,
        }
    }

    /// Number of stored keys, including ones not yet lazily expired.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remaining TTL in seconds for a live key.
    pub fn ttl(&self, key: &str) -> Option<i64> {
        let now = self.clock.now();
        self.data
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|expires_at| expires_at - now)
            .filter(|remaining| *remaining > 0)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let now = self.clock.now();
        if let Some(entry) = self.data.get(key) {
            match entry.expires_at {
                Some(expires_at) if expires_at <= now => {}
                _ => return Ok(Some(entry.value.clone())),
            }
        } else {
            return Ok(None);
        }

        trace!("GET key={} expired", key);
        self.data.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), StorageError> {
        let expires_at = ttl.map(|secs| self.clock.now() + secs as i64);
        self.data.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.data.remove(key);
        Ok(())
    }
}

/// In-memory attempt table.
#[derive(Default)]
pub struct MemoryAttemptTable {
    rows: RwLock<Vec<AttemptRow>>,
}

impl MemoryAttemptTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows.
    pub fn rows(&self) -> Vec<AttemptRow> {
        self.rows.read().clone()
    }
}

#[async_trait]
impl AttemptTable for MemoryAttemptTable {
    async fn insert(&self, row: &AttemptRow) -> Result<(), StorageError> {
        self.rows.write().push(row.clone());
        Ok(())
    }

    async fn count(&self, filter: &AttemptFilter) -> Result<u64, StorageError> {
        Ok(self.rows.read().iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn delete(&self, filter: &AttemptFilter) -> Result<u64, StorageError> {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|r| !filter.matches(r));
        Ok((before - rows.len()) as u64)
    }
}
