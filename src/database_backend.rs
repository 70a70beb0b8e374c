//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Durable attempt backend
//!
//! Stores one row per attempt in the `bruteforce_attempts` table. Metadata is
//! stored as its JSON encoding, truncated to 254 bytes plus `…`, and compared
//! on that stored form.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::attempts::{encode_metadata, truncate_metadata, AttemptBackend, Metadata};
use crate::clock::Clock;
use crate::constants::ATTEMPT_RETENTION_SECS;
use crate::error::StorageError;
use crate::storage::{AttemptFilter, AttemptRow, AttemptTable};

/// Attempt backend over a relational table.
#[derive(Clone)]
pub struct DatabaseBackend {
    table: Arc<dyn AttemptTable>,
    clock: Arc<dyn Clock>,
}

impl DatabaseBackend {
    /// Create a backend on `table`, reading time from `clock`.
    pub fn new(table: Arc<dyn AttemptTable>, clock: Arc<dyn Clock>) -> Self {
        Self { table, clock }
    }

    fn stored_metadata(metadata: &Metadata) -> String {
        truncate_metadata(&encode_metadata(metadata))
    }
}

#[async_trait]
impl AttemptBackend for DatabaseBackend {
    async fn register_attempt(
        &self,
        ip: &str,
        ip_subnet: &str,
        timestamp: i64,
        action: &str,
        metadata: &Metadata,
    ) -> Result<(), StorageError> {
        debug!(
            "Registering attempt: ip={}, subnet={}, action={}",
            ip, ip_subnet, action
        );
        let row = AttemptRow {
            ip: ip.to_string(),
            subnet: ip_subnet.to_string(),
            action: action.to_string(),
            metadata: Self::stored_metadata(metadata),
            occurred: timestamp,
        };
        self.table.insert(&row).await
    }

    async fn get_attempts(
        &self,
        ip_subnet: &str,
        max_age_timestamp: i64,
        action: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<u64, StorageError> {
        let mut filter = AttemptFilter::subnet(ip_subnet).occurred_after(max_age_timestamp);
        if let Some(action) = action {
            filter = filter.action(action);
            if let Some(metadata) = metadata {
                filter = filter.metadata(Self::stored_metadata(metadata));
            }
        }
        self.table.count(&filter).await
    }

    async fn reset_attempts(
        &self,
        ip_subnet: &str,
        action: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<(), StorageError> {
        let mut filter = AttemptFilter::subnet(ip_subnet);
        if let Some(action) = action {
            filter = filter.action(action);
            if let Some(metadata) = metadata {
                filter = filter.metadata(Self::stored_metadata(metadata));
            }
        }

        let deleted = self.table.delete(&filter).await?;
        debug!(
            "Reset attempts: subnet={}, action={:?}, deleted={}",
            ip_subnet, action, deleted
        );

        // Same-action rows of other users that fell out of the window go too.
        if let (Some(action), Some(_)) = (action, metadata) {
            let cutoff = self.clock.now() - ATTEMPT_RETENTION_SECS;
            let pruned = self
                .table
                .delete(
                    &AttemptFilter::subnet(ip_subnet)
                        .action(action)
                        .occurred_before(cutoff),
                )
                .await?;
            if pruned > 0 {
                debug!(
                    "Pruned expired attempts: subnet={}, action={}, deleted={}",
                    ip_subnet, action, pruned
                );
            }
        }

        Ok(())
    }
}
