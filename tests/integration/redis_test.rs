//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Cache backend over Redis

use crate::common::{manual_clock, NOW};
use bfguard::redis_storage::{RedisConfig, RedisStorage};
use bfguard::{AttemptBackend, CacheBackend, Metadata, Storage};
use std::sync::Arc;

async fn connect() -> Arc<RedisStorage> {
    let config = RedisConfig::new("redis://localhost:6379").key_prefix("bfguard-test:");
    Arc::new(RedisStorage::new(config).await.unwrap())
}

/// Connection check
#[tokio::test]
#[ignore] // Requires a running Redis
async fn test_redis_connection() {
    let storage = connect().await;
    assert!(storage.ping().await.is_ok());
}

/// Packed list survives a round trip through Redis
#[tokio::test]
#[ignore]
async fn test_redis_backend_round_trip() {
    let storage = connect().await;
    let subnet = "192.0.2.77/32";
    let backend = CacheBackend::new(storage.clone(), manual_clock());
    backend.reset_attempts(subnet, None, None).await.unwrap();

    for _ in 0..3 {
        backend
            .register_attempt("192.0.2.77", subnet, NOW, "login", &Metadata::new())
            .await
            .unwrap();
    }
    assert_eq!(backend.get_attempts(subnet, 0, None, None).await.unwrap(), 3);

    backend
        .reset_attempts(subnet, Some("login"), None)
        .await
        .unwrap();
    assert_eq!(
        storage
            .get(&CacheBackend::cache_key(subnet))
            .await
            .unwrap(),
        None
    );
}
