//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Distributed-cache attempt backend
//!
//! All attempts of one subnet are packed into a single cache entry:
//!
//! ```text
//! key   = sha1(subnet)
//! value = ["<timestamp>#<sha1(action)>#<sha1(metadata json)>", ...]
//! ```
//!
//! Every write rewrites the whole list with a 12 hour TTL, pruning entries
//! older than the retention window first. Action and metadata are compared by
//! digest only.
//!
//! The read-modify-write is not atomic: two registrations for the same subnet
//! racing each other can lose one of them. Attempt counting is approximate by
//! nature and this is accepted.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::attempts::{encode_metadata, sha1_hex, AttemptBackend, Metadata};
use crate::clock::Clock;
use crate::constants::{ATTEMPT_RETENTION_SECS, CACHE_ENTRY_SEPARATOR};
use crate::error::StorageError;
use crate::storage::Storage;

/// One decoded cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PackedAttempt {
    occurred: i64,
    action_hash: String,
    metadata_hash: String,
}

impl PackedAttempt {
    fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, CACHE_ENTRY_SEPARATOR);
        let occurred = parts.next()?.parse().ok()?;
        let action_hash = parts.next()?.to_string();
        let metadata_hash = parts.next()?.to_string();
        Some(Self {
            occurred,
            action_hash,
            metadata_hash,
        })
    }

    fn pack(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.occurred,
            self.action_hash,
            self.metadata_hash,
            sep = CACHE_ENTRY_SEPARATOR
        )
    }
}

/// Attempt backend over a key-value cache.
#[derive(Clone)]
pub struct CacheBackend {
    cache: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl CacheBackend {
    /// Create a backend on `cache`, reading time from `clock`.
    pub fn new(cache: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { cache, clock }
    }

    /// Cache key holding the attempts of a subnet.
    pub fn cache_key(ip_subnet: &str) -> String {
        sha1_hex(ip_subnet)
    }

    /// Load the packed list; unreadable data counts as no attempts.
    async fn load(&self, key: &str) -> Result<Vec<PackedAttempt>, StorageError> {
        let Some(raw) = self.cache.get(key).await? else {
            return Ok(Vec::new());
        };

        let entries: Vec<String> = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            // Sparse lists arrive as JSON objects keyed by index.
            Ok(serde_json::Value::Object(items)) => items
                .into_iter()
                .filter_map(|(_, v)| v.as_str().map(str::to_string))
                .collect(),
            Ok(_) | Err(_) => {
                warn!("Ignoring malformed attempt list in cache key {}", key);
                return Ok(Vec::new());
            }
        };

        let attempts: Vec<PackedAttempt> =
            entries.iter().filter_map(|e| PackedAttempt::parse(e)).collect();
        if attempts.len() != entries.len() {
            warn!(
                "Skipped {} malformed attempt entries in cache key {}",
                entries.len() - attempts.len(),
                key
            );
        }
        Ok(attempts)
    }

    async fn store(&self, key: &str, attempts: &[PackedAttempt]) -> Result<(), StorageError> {
        let packed: Vec<String> = attempts.iter().map(PackedAttempt::pack).collect();
        let value = serde_json::to_string(&packed)
            .map_err(|e| StorageError::QueryError(format!("failed to encode attempts: {}", e)))?;
        self.cache
            .set(key, &value, Some(ATTEMPT_RETENTION_SECS as u64))
            .await
    }

    fn retention_cutoff(&self) -> i64 {
        self.clock.now() - ATTEMPT_RETENTION_SECS
    }
}

#[async_trait]
impl AttemptBackend for CacheBackend {
    async fn register_attempt(
        &self,
        _ip: &str,
        ip_subnet: &str,
        timestamp: i64,
        action: &str,
        metadata: &Metadata,
    ) -> Result<(), StorageError> {
        let key = Self::cache_key(ip_subnet);
        let cutoff = self.retention_cutoff();

        let mut attempts = self.load(&key).await?;
        attempts.retain(|a| a.occurred >= cutoff);
        attempts.push(PackedAttempt {
            occurred: timestamp,
            action_hash: sha1_hex(action),
            metadata_hash: sha1_hex(&encode_metadata(metadata)),
        });

        debug!(
            "Registering attempt: subnet={}, action={}, stored={}",
            ip_subnet,
            action,
            attempts.len()
        );
        self.store(&key, &attempts).await
    }

    async fn get_attempts(
        &self,
        ip_subnet: &str,
        max_age_timestamp: i64,
        action: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<u64, StorageError> {
        let action_hash = action.map(sha1_hex);
        let metadata_hash = match action {
            Some(_) => metadata.map(|m| sha1_hex(&encode_metadata(m))),
            None => None,
        };

        let attempts = self.load(&Self::cache_key(ip_subnet)).await?;
        let count = attempts
            .iter()
            .filter(|a| action_hash.as_ref().map_or(true, |h| &a.action_hash == h))
            .filter(|a| metadata_hash.as_ref().map_or(true, |h| &a.metadata_hash == h))
            .filter(|a| a.occurred > max_age_timestamp)
            .count();

        Ok(count as u64)
    }

    async fn reset_attempts(
        &self,
        ip_subnet: &str,
        action: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<(), StorageError> {
        let key = Self::cache_key(ip_subnet);

        let Some(action) = action else {
            debug!("Resetting all attempts: subnet={}", ip_subnet);
            return self.cache.delete(&key).await;
        };

        let action_hash = sha1_hex(action);
        let metadata_hash = metadata.map(|m| sha1_hex(&encode_metadata(m)));
        let cutoff = self.retention_cutoff();

        let mut attempts = self.load(&key).await?;
        attempts.retain(|a| {
            if a.action_hash != action_hash {
                return true;
            }
            let metadata_matches = metadata_hash
                .as_ref()
                .map_or(true, |h| &a.metadata_hash == h);
            !metadata_matches && a.occurred >= cutoff
        });

        debug!(
            "Resetting attempts: subnet={}, action={}, remaining={}",
            ip_subnet,
            action,
            attempts.len()
        );

        if attempts.is_empty() {
            self.cache.delete(&key).await
        } else {
            self.store(&key, &attempts).await
        }
    }
}
