//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Behaviour shared by both attempt backends

use crate::common::{all_backends, user, NOW};
use bfguard::constants::ATTEMPT_RETENTION_SECS;
use bfguard::{Clock, Metadata};

const SUBNET: &str = "203.0.113.5/32";
const IP: &str = "203.0.113.5";

#[tokio::test]
async fn test_count_grows_with_each_attempt() {
    for (name, backend, _) in all_backends() {
        for expected in 1..=5u64 {
            backend
                .register_attempt(IP, SUBNET, NOW, "login", &Metadata::new())
                .await
                .unwrap();
            assert_eq!(
                backend.get_attempts(SUBNET, 0, None, None).await.unwrap(),
                expected,
                "{}",
                name
            );
        }
    }
}

#[tokio::test]
async fn test_cutoff_is_exclusive() {
    for (name, backend, _) in all_backends() {
        backend
            .register_attempt(IP, SUBNET, NOW - 10, "login", &Metadata::new())
            .await
            .unwrap();
        assert_eq!(
            backend
                .get_attempts(SUBNET, NOW - 10, Some("login"), None)
                .await
                .unwrap(),
            0,
            "{}",
            name
        );
        assert_eq!(
            backend
                .get_attempts(SUBNET, NOW - 11, Some("login"), None)
                .await
                .unwrap(),
            1,
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_subnets_are_isolated() {
    for (name, backend, _) in all_backends() {
        backend
            .register_attempt(IP, SUBNET, NOW, "login", &Metadata::new())
            .await
            .unwrap();
        assert_eq!(
            backend
                .get_attempts("203.0.113.6/32", 0, None, None)
                .await
                .unwrap(),
            0,
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_reset_scoping() {
    for (name, backend, _) in all_backends() {
        for action in ["login", "login", "webdav"] {
            backend
                .register_attempt(IP, SUBNET, NOW, action, &Metadata::new())
                .await
                .unwrap();
        }

        backend
            .reset_attempts(SUBNET, Some("login"), None)
            .await
            .unwrap();
        assert_eq!(
            backend
                .get_attempts(SUBNET, 0, Some("login"), None)
                .await
                .unwrap(),
            0,
            "{}",
            name
        );
        assert_eq!(
            backend
                .get_attempts(SUBNET, 0, Some("webdav"), None)
                .await
                .unwrap(),
            1,
            "{}",
            name
        );

        backend.reset_attempts(SUBNET, None, None).await.unwrap();
        assert_eq!(
            backend.get_attempts(SUBNET, 0, None, None).await.unwrap(),
            0,
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_metadata_equality() {
    for (name, backend, _) in all_backends() {
        backend
            .register_attempt(IP, SUBNET, NOW, "login", &user("alice"))
            .await
            .unwrap();
        backend
            .register_attempt(IP, SUBNET, NOW, "login", &user("bob"))
            .await
            .unwrap();

        assert_eq!(
            backend
                .get_attempts(SUBNET, 0, Some("login"), Some(&user("alice")))
                .await
                .unwrap(),
            1,
            "{}",
            name
        );

        backend
            .reset_attempts(SUBNET, Some("login"), Some(&user("alice")))
            .await
            .unwrap();
        assert_eq!(
            backend
                .get_attempts(SUBNET, 0, Some("login"), None)
                .await
                .unwrap(),
            1,
            "{}",
            name
        );
        assert_eq!(
            backend
                .get_attempts(SUBNET, 0, Some("login"), Some(&user("bob")))
                .await
                .unwrap(),
            1,
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_attempts_vanish_after_retention() {
    for (name, backend, clock) in all_backends() {
        backend
            .register_attempt(IP, SUBNET, clock.now(), "login", &Metadata::new())
            .await
            .unwrap();
        clock.advance(ATTEMPT_RETENTION_SECS + 1);

        let cutoff = clock.now() - ATTEMPT_RETENTION_SECS;
        assert_eq!(
            backend
                .get_attempts(SUBNET, cutoff, Some("login"), None)
                .await
                .unwrap(),
            0,
            "{}",
            name
        );
    }
}
