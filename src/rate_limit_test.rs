use super::*;

fn limiter(times: usize, window_secs: u64) -> RateLimiter {
    RateLimiter::with_config(RateLimitConfig { times, window: Duration::from_secs(window_secs) })
}

// =============================================================================
// WINDOW BEHAVIOR
// =============================================================================

#[test]
fn allows_up_to_limit_within_window() {
    let limiter = limiter(3, 60);
    let user = Uuid::new_v4();
    let now = Instant::now();

    for _ in 0..3 {
        assert!(limiter.check_and_record_at(user, now).is_ok());
    }
    assert!(limiter.check_and_record_at(user, now).is_err());
}

#[test]
fn denial_reports_limit_and_window() {
    let limiter = limiter(1, 50);
    let user = Uuid::new_v4();
    let now = Instant::now();

    limiter.check_and_record_at(user, now).unwrap();
    let err = limiter.check_and_record_at(user, now).unwrap_err();

    assert!(matches!(err, RateLimitError::Exceeded { limit: 1, window_secs: 50 }));
    assert_eq!(err.retry_after_secs(), 50);
}

#[test]
fn window_expiry_readmits() {
    let limiter = limiter(1, 60);
    let user = Uuid::new_v4();
    let start = Instant::now();

    limiter.check_and_record_at(user, start).unwrap();
    assert!(limiter
        .check_and_record_at(user, start + Duration::from_secs(30))
        .is_err());
    assert!(limiter
        .check_and_record_at(user, start + Duration::from_secs(61))
        .is_ok());
}

#[test]
fn denied_attempt_is_not_recorded() {
    let limiter = limiter(1, 60);
    let user = Uuid::new_v4();
    let start = Instant::now();

    limiter.check_and_record_at(user, start).unwrap();
    // Denied attempts at t+30 must not extend the window past t+60.
    let _ = limiter.check_and_record_at(user, start + Duration::from_secs(30));
    assert!(limiter
        .check_and_record_at(user, start + Duration::from_secs(61))
        .is_ok());
}

#[test]
fn sliding_window_drops_only_expired_entries() {
    let limiter = limiter(2, 60);
    let user = Uuid::new_v4();
    let start = Instant::now();

    limiter.check_and_record_at(user, start).unwrap();
    limiter
        .check_and_record_at(user, start + Duration::from_secs(40))
        .unwrap();

    // At t+70 the first entry has aged out but the second has not.
    limiter
        .check_and_record_at(user, start + Duration::from_secs(70))
        .unwrap();
    assert!(limiter
        .check_and_record_at(user, start + Duration::from_secs(71))
        .is_err());
}

// =============================================================================
// IDENTITY SCOPING
// =============================================================================

#[test]
fn identities_are_throttled_independently() {
    let limiter = limiter(1, 60);
    let now = Instant::now();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    limiter.check_and_record_at(alice, now).unwrap();
    assert!(limiter.check_and_record_at(alice, now).is_err());
    assert!(limiter.check_and_record_at(bob, now).is_ok());
}

#[test]
fn clones_share_one_backing_store() {
    let limiter = limiter(1, 60);
    let clone = limiter.clone();
    let user = Uuid::new_v4();
    let now = Instant::now();

    limiter.check_and_record_at(user, now).unwrap();
    assert!(clone.check_and_record_at(user, now).is_err());
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn with_config_overrides_defaults() {
    let limiter = limiter(1, 7);
    let user = Uuid::new_v4();
    let now = Instant::now();

    limiter.check_and_record_at(user, now).unwrap();
    let err = limiter.check_and_record_at(user, now).unwrap_err();
    assert_eq!(err.retry_after_secs(), 7);
}
