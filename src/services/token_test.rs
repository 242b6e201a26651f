use super::*;

fn test_config() -> TokenConfig {
    TokenConfig::new("testsecret", DEFAULT_EXPIRE_MINUTES)
}

// =============================================================================
// ISSUE
// =============================================================================

#[test]
fn issue_returns_three_part_token() {
    let token = issue_token(&test_config(), "test@example.com").unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn issued_token_carries_email_and_expiry() {
    let config = test_config();
    let before = OffsetDateTime::now_utc().unix_timestamp();
    let token = issue_token(&config, "test@example.com").unwrap();

    let data = decode::<Claims>(&token, &config.decoding, &Validation::new(Algorithm::HS256)).unwrap();
    assert_eq!(data.claims.sub, "test@example.com");

    let expected = before + DEFAULT_EXPIRE_MINUTES * 60;
    assert!((data.claims.exp - expected).abs() <= 5, "exp {} not near {expected}", data.claims.exp);
}

// =============================================================================
// VERIFY
// =============================================================================

#[test]
fn verify_round_trips_subject() {
    let config = test_config();
    let token = issue_token(&config, "alice@example.com").unwrap();
    assert_eq!(verify_token(&config, &token).unwrap(), "alice@example.com");
}

#[test]
fn verify_rejects_expired_token() {
    let config = test_config();
    // Past the default 60s validation leeway.
    let token = issue_token_with_ttl(&config, "alice@example.com", Duration::minutes(-10)).unwrap();
    assert_eq!(verify_token(&config, &token).unwrap_err(), TokenError::Expired);
}

#[test]
fn verify_rejects_garbage() {
    let config = test_config();
    assert_eq!(verify_token(&config, "this.is.an.invalid.token").unwrap_err(), TokenError::Invalid);
    assert_eq!(verify_token(&config, "").unwrap_err(), TokenError::Invalid);
}

#[test]
fn verify_rejects_wrong_secret() {
    let token = issue_token(&TokenConfig::new("othersecret", 30), "alice@example.com").unwrap();
    assert_eq!(verify_token(&test_config(), &token).unwrap_err(), TokenError::Invalid);
}

// =============================================================================
// ERROR STRINGS — these are the 401 detail messages
// =============================================================================

#[test]
fn error_display_matches_http_details() {
    assert_eq!(TokenError::Expired.to_string(), "Token has expired");
    assert_eq!(TokenError::Invalid.to_string(), "Could not validate credentials");
}
