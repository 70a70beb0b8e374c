//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Prelude module - Commonly used types for quick imports
//!
//! `use bfguard::prelude::*;` brings the cipher, the throttler and the
//! backend building blocks into scope.

// Core types - always available
pub use crate::attempts::{AttemptBackend, Metadata};
pub use crate::blowfish::Blowfish;
pub use crate::clock::{Clock, SystemClock};
pub use crate::config::{BackendKind, ThrottlerConfig};
pub use crate::error::{BfGuardError, CipherError, StorageError};
pub use crate::throttler::Throttler;

// Backends and in-process storage
pub use crate::cache_backend::CacheBackend;
pub use crate::database_backend::DatabaseBackend;
pub use crate::storage::{MemoryAttemptTable, MemoryStorage, Storage};

// Feature-gated exports
#[cfg(feature = "postgres")]
pub use crate::postgres_storage::PostgresStorage;

#[cfg(feature = "redis")]
pub use crate::redis_storage::RedisStorage;
