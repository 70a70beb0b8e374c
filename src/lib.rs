//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! bfguard - Blowfish cipher and bruteforce throttling
//!
//! Two independent facilities:
//!
//! - A Blowfish block cipher (ECB, NUL padding) with published
//!   known-answer compatibility.
//! - A failed-attempt tracker keyed by client subnet, with a durable
//!   table backend and a distributed-cache backend, plus a throttler
//!   that turns recent attempts into exponential delays.
//!
//! # API Layers
//!
//! ## Prelude (Quick Start)
//!
//! Use `use bfguard::prelude::*;` to import all commonly used types.
//!
//! ## Core API
//!
//! - [`Blowfish`] - Block cipher
//! - [`Throttler`] - Attempt policy layer
//! - [`AttemptBackend`] - Backend contract, implemented by
//!   [`DatabaseBackend`] and [`CacheBackend`]
//! - [`ThrottlerConfig`] - Configuration
//! - [`BfGuardError`] - Error types
//!
//! ## Storage drivers (feature-gated)
//!
//! - PostgreSQL attempt table (requires `postgres` feature)
//! - Redis cache (requires `redis` feature)
//!
//! # Examples
//!
//! ```rust
//! use bfguard::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ThrottlerConfig {
//!         testing: true,
//!         ..Default::default()
//!     };
//!     let throttler = Throttler::in_memory(config, Arc::new(SystemClock)).unwrap();
//!
//!     throttler
//!         .register_attempt("login", "192.0.2.10", &Metadata::new())
//!         .await
//!         .unwrap();
//!     assert_eq!(throttler.get_delay("192.0.2.10", "login").await.unwrap(), 200);
//!
//!     let cipher = Blowfish::new(b"secret").unwrap();
//!     assert_eq!(cipher.encrypt_hex(b"hello"), "3efe022eca4b05b1");
//! }
//! ```

pub mod prelude;

pub mod attempts;
pub mod blowfish;
pub mod cache_backend;
pub mod clock;
pub mod config;
pub mod constants;
pub mod database_backend;
pub mod error;
pub mod ip_address;
#[cfg(feature = "postgres")]
pub mod postgres_storage;
#[cfg(feature = "redis")]
pub mod redis_storage;
pub mod storage;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod throttler;

pub use attempts::{AttemptBackend, AttemptRecord, Metadata};
pub use blowfish::Blowfish;
pub use cache_backend::CacheBackend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BackendKind, ThrottlerConfig};
pub use database_backend::DatabaseBackend;
pub use error::{BfGuardError, CipherError, StorageError};
pub use ip_address::{IpAddress, IpRange};
#[cfg(feature = "postgres")]
pub use postgres_storage::{PostgresStorage, PostgresStorageConfig};
#[cfg(feature = "redis")]
pub use redis_storage::{RedisConfig, RedisStorage};
pub use storage::{
    AttemptFilter, AttemptRow, AttemptTable, MemoryAttemptTable, MemoryStorage, Storage,
};
#[cfg(feature = "telemetry")]
pub use telemetry::{init_tracing, init_tracing_from_env};
pub use throttler::Throttler;
