//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Throttler policy over both backends

use crate::common::{testing_throttler, user};
use bfguard::{BackendKind, BfGuardError, Metadata};

const BACKENDS: [BackendKind; 2] = [BackendKind::Database, BackendKind::Cache];

#[tokio::test]
async fn test_delay_doubles_per_attempt() {
    for kind in BACKENDS {
        let (throttler, _) = testing_throttler(kind);
        let mut expected = 100;
        for _ in 0..7 {
            throttler
                .register_attempt("login", "198.51.100.20", &Metadata::new())
                .await
                .unwrap();
            expected *= 2;
            assert_eq!(
                throttler.get_delay("198.51.100.20", "login").await.unwrap(),
                expected,
                "{:?}",
                kind
            );
        }

        throttler
            .register_attempt("login", "198.51.100.20", &Metadata::new())
            .await
            .unwrap();
        assert_eq!(
            throttler.get_delay("198.51.100.20", "login").await.unwrap(),
            25_000,
            "{:?}",
            kind
        );
    }
}

#[tokio::test]
async fn test_successful_login_resets_only_that_user() {
    for kind in BACKENDS {
        let (throttler, _) = testing_throttler(kind);
        throttler
            .register_attempt("login", "198.51.100.20", &user("alice"))
            .await
            .unwrap();
        throttler
            .register_attempt("login", "198.51.100.20", &user("mallory"))
            .await
            .unwrap();

        throttler
            .reset_delay("198.51.100.20", "login", Some(&user("alice")))
            .await
            .unwrap();
        assert_eq!(
            throttler
                .get_attempts("198.51.100.20", "login", 12.0)
                .await
                .unwrap(),
            1,
            "{:?}",
            kind
        );
    }
}

#[tokio::test]
async fn test_lockout_after_burst() {
    for kind in BACKENDS {
        let (throttler, _) = testing_throttler(kind);
        for _ in 0..10 {
            throttler
                .register_attempt("login", "2001:db8:aa::1", &Metadata::new())
                .await
                .unwrap();
        }
        assert_eq!(
            throttler
                .sleep_delay_or_throw_on_max("2001:db8:aa::1", "login")
                .await
                .unwrap(),
            25_000,
            "{:?}",
            kind
        );

        // An eleventh attempt from a neighbour in the same /64 trips the lockout.
        throttler
            .register_attempt("login", "2001:db8:aa::2", &Metadata::new())
            .await
            .unwrap();
        assert!(
            matches!(
                throttler
                    .sleep_delay_or_throw_on_max("2001:db8:aa::1", "login")
                    .await,
                Err(BfGuardError::MaxDelayReached { attempts: 11, .. })
            ),
            "{:?}",
            kind
        );
    }
}

#[tokio::test]
async fn test_reset_for_ip_clears_every_action() {
    for kind in BACKENDS {
        let (throttler, _) = testing_throttler(kind);
        for action in ["login", "webdav", "ocs"] {
            throttler
                .register_attempt(action, "192.0.2.1", &Metadata::new())
                .await
                .unwrap();
        }
        throttler.reset_delay_for_ip("192.0.2.1").await.unwrap();
        assert_eq!(
            throttler.get_attempts("192.0.2.1", "", 12.0).await.unwrap(),
            0,
            "{:?}",
            kind
        );
    }
}
