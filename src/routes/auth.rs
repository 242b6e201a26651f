//! Bearer-token authentication for the chat routes.
//!
//! DESIGN
//! ======
//! Stateless auth: the Authorization header carries an HS256 JWT whose
//! subject is the account email. The extractor verifies the signature first
//! and only then loads the account row, so downstream handlers always see
//! current quota fields rather than claims baked into the token. Rejection
//! bodies reuse the token error strings verbatim as the `detail` field.

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};

use crate::services::token::{self, TokenError};
use crate::services::usage::{self, User};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated account extracted from the bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: User,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(reason: &TokenError) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "detail": reason.to_string() })))
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(unauthorized(&TokenError::Invalid));
        };

        let app_state = AppState::from_ref(state);
        let email = token::verify_token(&app_state.tokens, token).map_err(|e| unauthorized(&e))?;

        let user = usage::fetch_by_email(&app_state.pool, &email)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "auth: account lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "detail": format!("Database error: {e}") })),
                )
            })?
            .ok_or_else(|| unauthorized(&TokenError::Invalid))?;

        Ok(Self { user })
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
