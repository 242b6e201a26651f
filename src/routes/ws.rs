//! Websocket chat sessions.
//!
//! DESIGN
//! ======
//! One socket per signed-in client. Browsers cannot set headers on a
//! websocket handshake, so the token rides in the query string and auth
//! happens after the upgrade: a bad credential gets a 1008 close frame
//! rather than an HTTP 401. Once authenticated, each inbound text frame is
//! one prompt and the reply is either a serialized exchange or an
//! `{"error": ...}` payload on the same socket. A failed prompt never tears
//! down the session.
//!
//! RATE LIMITING
//! =============
//! The per-user sliding window is enforced here and only here. Malformed
//! frames are rejected before the limiter runs, so they never consume a
//! slot.

use std::collections::HashMap;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::platforms::Platform;
use crate::services::chat;
use crate::services::token;
use crate::services::usage;
use crate::state::AppState;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Inbound frame: one prompt aimed at one platform.
#[derive(Deserialize)]
struct WsChatRequest {
    model_name: Platform,
    prompt: String,
}

fn error_payload(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

// =============================================================================
// HANDLER
// =============================================================================

/// GET /ai/ws/chat?token=...
pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let token = params.get("token").cloned();
    ws.on_upgrade(move |socket| run_ws(socket, state, token))
}

async fn run_ws(mut socket: WebSocket, state: AppState, token: Option<String>) {
    let user_id = match authenticate(&state, token.as_deref()).await {
        Ok(user_id) => user_id,
        Err(close) => {
            warn!(code = close.code, "ws: rejecting unauthenticated session");
            let _ = socket.send(Message::Close(Some(close))).await;
            return;
        }
    };

    info!(%user_id, "ws: chat session open");

    loop {
        let Some(msg) = socket.recv().await else { break };
        let Ok(msg) = msg else { break };

        match msg {
            Message::Text(text) => {
                let reply = process_message(&state, user_id, text.as_str()).await;
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            // Ping/pong is handled by axum; binary frames are not part of
            // the protocol.
            _ => {}
        }
    }

    info!(%user_id, "ws: chat session closed");
}

// =============================================================================
// AUTH
// =============================================================================

/// Resolve the query-string token to an account id, or produce the close
/// frame the socket should be shut with.
async fn authenticate(state: &AppState, token: Option<&str>) -> Result<Uuid, CloseFrame> {
    let Some(token) = token else {
        return Err(policy_close("missing token"));
    };

    let email = match token::verify_token(&state.tokens, token) {
        Ok(email) => email,
        Err(e) => return Err(policy_close(&e.to_string())),
    };

    match usage::fetch_by_email(&state.pool, &email).await {
        Ok(Some(user)) => Ok(user.id),
        Ok(None) => Err(policy_close("unknown account")),
        Err(e) => {
            error!(error = %e, "ws: auth lookup failed");
            Err(CloseFrame { code: close_code::ERROR, reason: "internal error".into() })
        }
    }
}

fn policy_close(reason: &str) -> CloseFrame {
    CloseFrame { code: close_code::POLICY, reason: reason.to_owned().into() }
}

// =============================================================================
// MESSAGE PIPELINE
// =============================================================================

/// Turn one inbound text frame into the outbound payload. Every branch
/// produces a frame; the socket stays open whatever the outcome.
async fn process_message(state: &AppState, user_id: Uuid, text: &str) -> String {
    let request: WsChatRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(e) => {
            warn!(%user_id, error = %e, "ws: unparseable frame");
            return error_payload(&format!("invalid message: {e}"));
        }
    };

    if let Err(e) = state.rate_limiter.check_and_record(user_id) {
        return error_payload(&format!(
            "You have exceeded the rate limit. Please try again after {} seconds.",
            e.retry_after_secs()
        ));
    }

    match chat::process_prompt(state, user_id, request.model_name, &request.prompt).await {
        Ok((exchange, _remaining)) => serde_json::to_string(&exchange).unwrap_or_else(|e| {
            warn!(%user_id, error = %e, "ws: reply serialization failed");
            error_payload("internal serialization error")
        }),
        Err(e) => {
            warn!(%user_id, error = %e, "ws: prompt rejected");
            error_payload(&e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
