//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! A login endpoint guarded by the throttler

use crate::common::{manual_clock, user};
use bfguard::{BfGuardError, ManualClock, Throttler, ThrottlerConfig};
use std::io::Write;
use std::sync::Arc;

const CONFIG: &str = r#"
testing: true
backend: cache
allowlist:
  - "10.0.0.0/8"
"#;

fn throttler_from_file() -> (Throttler, Arc<ManualClock>) {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let config = ThrottlerConfig::from_file(file.path()).unwrap();

    let clock = manual_clock();
    (Throttler::in_memory(config, clock.clone()).unwrap(), clock)
}

/// Failed login: wait the delay, then record the failure.
async fn fail_login(throttler: &Throttler, ip: &str, name: &str) -> Result<u64, BfGuardError> {
    let delay = throttler.sleep_delay_or_throw_on_max(ip, "login").await?;
    throttler.register_attempt("login", ip, &user(name)).await?;
    Ok(delay)
}

#[tokio::test]
async fn test_attacker_is_locked_out_then_released() {
    let (throttler, clock) = throttler_from_file();
    let attacker = "198.51.100.66";

    let mut delays = Vec::new();
    for _ in 0..11 {
        delays.push(fail_login(&throttler, attacker, "admin").await.unwrap());
    }
    assert_eq!(&delays[..4], &[0, 200, 400, 800]);
    assert_eq!(delays[10], 25_000);

    assert!(matches!(
        fail_login(&throttler, attacker, "admin").await,
        Err(BfGuardError::MaxDelayReached { .. })
    ));

    // Half an hour later the lockout lifts but the delay still applies.
    clock.advance(31 * 60);
    assert_eq!(fail_login(&throttler, attacker, "admin").await.unwrap(), 25_000);

    // After the retention window everything is forgotten.
    clock.advance(13 * 3600);
    assert_eq!(throttler.get_delay(attacker, "login").await.unwrap(), 0);
}

#[tokio::test]
async fn test_internal_network_is_never_throttled() {
    let (throttler, _) = throttler_from_file();
    for _ in 0..20 {
        assert_eq!(fail_login(&throttler, "10.1.2.3", "bob").await.unwrap(), 0);
    }
}

#[tokio::test]
async fn test_successful_login_clears_own_failures() {
    let (throttler, _) = throttler_from_file();
    let ip = "192.0.2.44";
    fail_login(&throttler, ip, "carol").await.unwrap();
    fail_login(&throttler, ip, "carol").await.unwrap();
    fail_login(&throttler, ip, "dave").await.unwrap();

    throttler
        .reset_delay(ip, "login", Some(&user("carol")))
        .await
        .unwrap();
    assert_eq!(throttler.get_delay(ip, "login").await.unwrap(), 200);
}
