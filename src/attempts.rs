//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Failed-attempt model and the backend contract.
//!
//! An attempt is keyed by the normalized subnet of the caller rather than the
//! raw address, so neighbouring addresses share one counter. Counts are never
//! stored; they are derived by filtering records on subnet, optional action,
//! optional metadata and a strict `occurred > max_age` cutoff.

use async_trait::async_trait;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

use crate::constants::{METADATA_MAX_LENGTH, METADATA_TRUNCATION_MARKER};
use crate::error::StorageError;

/// Opaque attempt metadata (e.g. the attempted user name).
pub type Metadata = BTreeMap<String, String>;

/// A failed security-sensitive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Raw client address
    pub ip: String,
    /// Normalized subnet the attempt is counted under
    pub subnet: String,
    /// Action name, e.g. `login`
    pub action: String,
    /// Caller-supplied metadata
    pub metadata: Metadata,
    /// Unix timestamp of the attempt
    pub occurred: i64,
}

/// Attempt backend interface
///
/// Both implementations must be indistinguishable to callers apart from
/// persistence and performance characteristics. Storage errors are returned
/// unmodified; backends never retry.
#[async_trait]
pub trait AttemptBackend: Send + Sync {
    /// Record an attempt under `ip_subnet`.
    async fn register_attempt(
        &self,
        ip: &str,
        ip_subnet: &str,
        timestamp: i64,
        action: &str,
        metadata: &Metadata,
    ) -> Result<(), StorageError>;

    /// Count attempts with `occurred > max_age_timestamp`.
    ///
    /// `metadata` is only considered when `action` is given.
    async fn get_attempts(
        &self,
        ip_subnet: &str,
        max_age_timestamp: i64,
        action: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<u64, StorageError>;

    /// Delete matching attempts.
    ///
    /// Without an action every attempt of the subnet is removed.
    async fn reset_attempts(
        &self,
        ip_subnet: &str,
        action: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<(), StorageError>;

    /// Record a complete [`AttemptRecord`].
    async fn register(&self, record: &AttemptRecord) -> Result<(), StorageError> {
        self.register_attempt(
            &record.ip,
            &record.subnet,
            record.occurred,
            &record.action,
            &record.metadata,
        )
        .await
    }
}

/// JSON encoding of metadata.
///
/// An empty mapping encodes as `[]`, the form existing attempt data uses, so
/// hashes and stored rows stay comparable.
pub fn encode_metadata(metadata: &Metadata) -> String {
    if metadata.is_empty() {
        return "[]".to_string();
    }
    // A map of strings always serializes.
    serde_json::to_string(metadata).unwrap_or_else(|_| "[]".to_string())
}

/// Encoded metadata capped for the durable table.
///
/// Encodings longer than 254 bytes keep their first 254 bytes (cut back to a
/// UTF-8 boundary) followed by `…`. Values sharing that prefix compare equal.
pub fn truncate_metadata(encoded: &str) -> String {
    if encoded.len() <= METADATA_MAX_LENGTH {
        return encoded.to_string();
    }

    let mut cut = METADATA_MAX_LENGTH;
    while !encoded.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut truncated = String::with_capacity(cut + METADATA_TRUNCATION_MARKER.len());
    truncated.push_str(&encoded[..cut]);
    truncated.push_str(METADATA_TRUNCATION_MARKER);
    truncated
}

/// Lowercase hex SHA-1 digest.
pub fn sha1_hex(data: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
