//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the chat HTTP endpoints and the websocket session
//! under a single Axum router. Everything lives under `/ai`; the websocket
//! path carries the realtime pipeline and the REST paths cover platform
//! discovery, history, and the legacy one-shot chat endpoint.

pub mod auth;
pub mod chat;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ai/platforms", get(chat::list_platforms))
        .route("/ai/chat-history", get(chat::get_chat_history))
        .route("/ai/chat", post(chat::post_chat))
        .route("/ai/ws/chat", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
