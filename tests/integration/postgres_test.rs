//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Durable backend over PostgreSQL

use crate::common::{manual_clock, user, NOW};
use bfguard::postgres_storage::{PostgresStorage, PostgresStorageConfig};
use bfguard::{AttemptBackend, AttemptFilter, AttemptTable, DatabaseBackend};
use std::sync::Arc;

const DATABASE_URL: &str = "postgresql://localhost/test";

async fn connect() -> Arc<PostgresStorage> {
    let storage = PostgresStorage::new(PostgresStorageConfig::new(DATABASE_URL))
        .await
        .unwrap();
    storage.ensure_schema().await.unwrap();
    Arc::new(storage)
}

/// Health check
#[tokio::test]
#[ignore] // Requires a running PostgreSQL
async fn test_postgres_health_check() {
    let storage = connect().await;
    assert!(storage.health_check().await.is_ok());
}

/// Backend semantics over the real table
#[tokio::test]
#[ignore]
async fn test_postgres_backend_round_trip() {
    let storage = connect().await;
    let subnet = "2001:db8:77::/64";
    storage.delete(&AttemptFilter::subnet(subnet)).await.unwrap();

    let backend = DatabaseBackend::new(storage.clone(), manual_clock());
    backend
        .register_attempt("2001:db8:77::1", subnet, NOW, "login", &user("alice"))
        .await
        .unwrap();
    backend
        .register_attempt("2001:db8:77::2", subnet, NOW, "login", &user("bob"))
        .await
        .unwrap();

    assert_eq!(
        backend
            .get_attempts(subnet, NOW - 1, Some("login"), Some(&user("bob")))
            .await
            .unwrap(),
        1
    );

    backend
        .reset_attempts(subnet, Some("login"), Some(&user("bob")))
        .await
        .unwrap();
    assert_eq!(backend.get_attempts(subnet, 0, None, None).await.unwrap(), 1);

    backend.reset_attempts(subnet, None, None).await.unwrap();
    assert_eq!(backend.get_attempts(subnet, 0, None, None).await.unwrap(), 0);
}
