//! Signed access tokens (HS256 JWT).
//!
//! DESIGN
//! ======
//! Stateless bearer credentials: `sub` carries the account email, `exp` the
//! expiry. Verification distinguishes an expired token from every other
//! defect because the two produce different 401 messages. Issuance lives
//! here too so the account subsystem and the tests share one implementation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

pub const DEFAULT_EXPIRE_MINUTES: i64 = 30;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Account email.
    sub: String,
    /// Expiry, unix seconds.
    exp: i64,
}

/// Signing/verification keys plus the default issuance lifetime.
#[derive(Clone)]
pub struct TokenConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expire_minutes: i64,
}

impl TokenConfig {
    #[must_use]
    pub fn new(secret: &str, expire_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expire_minutes,
        }
    }

    /// Keys from `SECRET_KEY`, lifetime from `ACCESS_TOKEN_EXPIRE_MINUTES`.
    ///
    /// # Panics
    ///
    /// Panics if `SECRET_KEY` is unset. Called once at startup; without a
    /// signing secret no credential can ever verify.
    #[must_use]
    pub fn from_env() -> Self {
        let secret = std::env::var("SECRET_KEY").expect("SECRET_KEY required");
        let expire_minutes = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EXPIRE_MINUTES);
        Self::new(&secret, expire_minutes)
    }
}

/// Why a credential was rejected. `Display` is the 401 detail string.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Could not validate credentials")]
    Invalid,
}

// =============================================================================
// ISSUE / VERIFY
// =============================================================================

/// Issue a token for `email` with the configured lifetime.
///
/// # Errors
///
/// Returns [`TokenError::Invalid`] if signing fails.
pub fn issue_token(config: &TokenConfig, email: &str) -> Result<String, TokenError> {
    issue_token_with_ttl(config, email, Duration::minutes(config.expire_minutes))
}

/// Issue a token with an explicit lifetime (negative for already-expired
/// tokens in tests).
///
/// # Errors
///
/// Returns [`TokenError::Invalid`] if signing fails.
pub fn issue_token_with_ttl(config: &TokenConfig, email: &str, ttl: Duration) -> Result<String, TokenError> {
    let exp = OffsetDateTime::now_utc() + ttl;
    let claims = Claims { sub: email.to_owned(), exp: exp.unix_timestamp() };
    encode(&Header::default(), &claims, &config.encoding).map_err(|_| TokenError::Invalid)
}

/// Verify a token and return the subject email.
///
/// # Errors
///
/// [`TokenError::Expired`] for an out-of-date `exp`, [`TokenError::Invalid`]
/// for every other defect (bad signature, malformed token, missing claims).
pub fn verify_token(config: &TokenConfig, token: &str) -> Result<String, TokenError> {
    let validation = Validation::new(Algorithm::HS256);
    match decode::<Claims>(token, &config.decoding, &validation) {
        Ok(data) => Ok(data.claims.sub),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => Err(TokenError::Invalid),
        },
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
