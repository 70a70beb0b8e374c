//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Shared test helpers
//!
//! Backends are built over in-process storage on a manual clock so tests can
//! move time explicitly.

#![allow(dead_code)]

use bfguard::{
    AttemptBackend, BackendKind, CacheBackend, DatabaseBackend, ManualClock, MemoryAttemptTable,
    MemoryStorage, Metadata, Throttler, ThrottlerConfig,
};
use std::sync::Arc;

/// Fixed starting time for every test clock.
pub const NOW: i64 = 1_700_000_000;

/// A clock frozen at [`NOW`].
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(NOW))
}

/// Durable backend over an in-memory table.
pub fn database_backend(clock: Arc<ManualClock>) -> Arc<dyn AttemptBackend> {
    Arc::new(DatabaseBackend::new(Arc::new(MemoryAttemptTable::new()), clock))
}

/// Cache backend over an in-memory cache honouring TTLs.
pub fn cache_backend(clock: Arc<ManualClock>) -> Arc<dyn AttemptBackend> {
    Arc::new(CacheBackend::new(
        Arc::new(MemoryStorage::with_clock(clock.clone())),
        clock,
    ))
}

/// Both backends, each on its own clock, labelled for assertion messages.
pub fn all_backends() -> Vec<(&'static str, Arc<dyn AttemptBackend>, Arc<ManualClock>)> {
    let db_clock = manual_clock();
    let cache_clock = manual_clock();
    vec![
        ("database", database_backend(db_clock.clone()), db_clock),
        ("cache", cache_backend(cache_clock.clone()), cache_clock),
    ]
}

/// Throttler that never sleeps.
pub fn testing_throttler(backend: BackendKind) -> (Throttler, Arc<ManualClock>) {
    let clock = manual_clock();
    let config = ThrottlerConfig {
        testing: true,
        backend,
        ..Default::default()
    };
    let throttler = Throttler::in_memory(config, clock.clone()).unwrap();
    (throttler, clock)
}

/// Metadata naming the attempted user.
pub fn user(name: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("user".to_string(), name.to_string());
    metadata
}
