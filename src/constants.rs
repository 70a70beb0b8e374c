//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Centralized configuration constants for bfguard.
//!
//! All magic numbers used by the cipher and the throttling backends are
//! defined here with their purpose and usage context.

// ============================================================================
// Blowfish Constants
// ============================================================================

/// Blowfish block size in bytes (64-bit blocks).
pub const BLOWFISH_BLOCK_SIZE: usize = 8;

/// Number of Feistel rounds.
pub const BLOWFISH_ROUNDS: usize = 16;

/// Maximum accepted key length in bytes (448 bits).
pub const BLOWFISH_MAX_KEY_LENGTH: usize = 56;

// ============================================================================
// Attempt Storage Constants
// ============================================================================

/// Logical table holding durable attempt rows.
pub const ATTEMPTS_TABLE: &str = "bruteforce_attempts";

/// Retention window for attempts (12 hours).
///
/// The cache backend prunes entries older than this on every write, and
/// uses it as the TTL of the packed attempt list.
pub const ATTEMPT_RETENTION_SECS: i64 = 12 * 3600;

/// Maximum stored length of encoded metadata in the durable backend.
///
/// Longer encodings are cut to this many bytes and marked with
/// [`METADATA_TRUNCATION_MARKER`].
pub const METADATA_MAX_LENGTH: usize = 254;

/// Marker appended to truncated metadata.
pub const METADATA_TRUNCATION_MARKER: &str = "…";

/// Separator between fields of a packed cache entry.
pub const CACHE_ENTRY_SEPARATOR: char = '#';

// ============================================================================
// Throttler Constants
// ============================================================================

/// Default window used when computing delays (12 hours).
pub const DEFAULT_RETENTION_HOURS: u32 = 12;

/// Upper bound for any caller-provided window (48 hours).
pub const MAX_AGE_HOURS_CAP: f64 = 48.0;

/// Window used by the lockout check (30 minutes).
pub const LOCKOUT_WINDOW_HOURS: f64 = 0.5;

/// Delay applied after the first failed attempt, in milliseconds (100 ms).
///
/// Subsequent attempts double it.
pub const FIRST_DELAY_MS: u64 = 100;

/// Default ceiling for the computed delay (25 seconds).
pub const DEFAULT_MAX_DELAY_MS: u64 = 25_000;

/// Default number of attempts tolerated before the maximum delay applies.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 10;

/// Default IPv4 prefix length used to group attempts.
pub const DEFAULT_IPV4_PREFIX: u8 = 32;

/// Default IPv6 prefix length used to group attempts.
pub const DEFAULT_IPV6_PREFIX: u8 = 64;
