//! Chat REST routes: platform listing, per-platform history, and the legacy
//! one-shot chat endpoint kept for clients that cannot hold a websocket.
//!
//! ERROR HANDLING
//! ==============
//! Handlers map [`ChatError`] onto HTTP statuses in one place
//! ([`chat_error_response`]) so the REST surface and its tests agree:
//! quota and availability rejections are 403, platform and database
//! failures are 500, and the `detail` body is always the error's
//! `Display` string.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::platforms::Platform;
use crate::services::chat::{self, ChatError, ChatExchange};
use crate::services::usage;
use crate::state::AppState;

use super::auth::AuthUser;

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub model_name: Platform,
}

#[derive(Serialize)]
pub struct UsageInfo {
    pub remaining_requests: i64,
    pub limit: i64,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub chat: Vec<ChatExchange>,
    pub usage_info: UsageInfo,
}

#[derive(Deserialize)]
pub struct ChatRequestBody {
    pub model_name: Platform,
    pub prompt: String,
}

#[derive(Serialize)]
pub struct ChatResponseBody {
    pub response: String,
    pub remaining_requests: i64,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// GET /ai/platforms
///
/// Lists every platform the server knows, whether or not it is currently
/// enabled. Availability is enforced when a prompt is sent, not here, so
/// clients can keep a stable picker UI.
pub async fn list_platforms() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "platforms": Platform::ALL }))
}

/// GET /ai/chat-history?model_name=...
///
/// Full transcript for the calling account on one platform, oldest first,
/// plus a quota snapshot so the client can render the remaining allowance
/// without a second request.
pub async fn get_chat_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, (StatusCode, Json<serde_json::Value>)> {
    let exchanges = chat::chat_history(&state.pool, auth.user.id, query.model_name)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %auth.user.id, "chat history query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "detail": format!("Database error: {e}") })),
            )
        })?;

    let status = usage::check_usage(&auth.user, state.usage_limit);
    Ok(Json(HistoryResponse {
        chat: exchanges,
        usage_info: UsageInfo { remaining_requests: status.remaining, limit: state.usage_limit },
    }))
}

/// POST /ai/chat
///
/// One-shot prompt/response over plain HTTP. Same pipeline as the
/// websocket path, without the rate limiter (connection churn is cost
/// enough here).
pub async fn post_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, (StatusCode, Json<serde_json::Value>)> {
    match chat::process_prompt(&state, auth.user.id, body.model_name, &body.prompt).await {
        Ok((exchange, remaining)) => {
            Ok(Json(ChatResponseBody { response: exchange.response, remaining_requests: remaining }))
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %auth.user.id, "chat request rejected");
            Err(chat_error_response(&e))
        }
    }
}

/// Single source of truth for the REST status mapping.
pub(crate) fn chat_error_response(err: &ChatError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        ChatError::ProviderUnavailable | ChatError::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
        ChatError::Platform(_) | ChatError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "detail": err.to_string() })))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
