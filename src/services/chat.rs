//! Chat pipeline and transcript store.
//!
//! DESIGN
//! ======
//! `process_prompt` is the one pipeline behind the WebSocket session and
//! both authenticated HTTP endpoints, in a fixed order: platform
//! availability → fresh quota read → provider call → one transaction
//! wrapping the conditional quota commit and the transcript append. A
//! request that fails at any stage costs the user nothing and stores
//! nothing; an exchange row exists if and only if its quota unit was
//! consumed.
//!
//! ERROR HANDLING
//! ==============
//! `ChatError`'s `Display` strings are the client-facing messages, sent
//! verbatim in WebSocket `{error}` payloads and HTTP `detail` bodies.

use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::platforms::{Platform, PlatformError};
use crate::services::usage;
use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

/// One persisted prompt/response pair. Serializes to exactly the wire shape
/// (`prompt`, `response`, `created_at`, `model_name`); row bookkeeping stays
/// off the wire.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatExchange {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub prompt: String,
    pub response: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub model_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Platform statically disabled at deploy time.
    #[error("This AI provider is currently unavailable due to free-tier limits.")]
    ProviderUnavailable,

    /// Lifetime cap consumed.
    #[error("AI usage limit reached. You have used all {limit} free messages.")]
    QuotaExceeded { limit: i64 },

    /// Upstream vendor failure. No retry; costs no quota.
    #[error("AI platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Persistence failure. The quota increment rolls back with it.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Run one chat request end to end and return the stored exchange plus the
/// caller's post-commit remaining allowance.
///
/// # Errors
///
/// Returns a [`ChatError`] describing the first stage that rejected the
/// request; nothing is persisted in that case.
pub async fn process_prompt(
    state: &AppState,
    user_id: Uuid,
    platform: Platform,
    prompt: &str,
) -> Result<(ChatExchange, i64), ChatError> {
    // Availability comes before everything else, so a disabled platform
    // never costs a quota read, let alone a provider call.
    if !state.platforms.is_available(platform) {
        return Err(ChatError::ProviderUnavailable);
    }

    let user = usage::fetch_by_id(&state.pool, user_id)
        .await?
        .ok_or(ChatError::Database(sqlx::Error::RowNotFound))?;

    let status = usage::check_usage(&user, state.usage_limit);
    if !status.allowed {
        return Err(ChatError::QuotaExceeded { limit: state.usage_limit });
    }

    let response = state.platforms.chat(platform, prompt).await?;

    // Commit + append atomically. The conditional increment re-checks the
    // cap, closing the window where two in-flight requests both passed the
    // pre-check above.
    let mut tx = state.pool.begin().await?;
    let Some(remaining) = usage::commit_usage(&mut tx, user_id, state.usage_limit).await? else {
        tx.rollback().await?;
        return Err(ChatError::QuotaExceeded { limit: state.usage_limit });
    };
    let exchange = append_exchange(&mut tx, user_id, platform, prompt, &response).await?;
    tx.commit().await?;

    Ok((exchange, remaining))
}

// =============================================================================
// TRANSCRIPT STORE
// =============================================================================

/// Append one exchange. Runs on the pipeline's transaction so the row and
/// the quota commit succeed or fail together.
///
/// # Errors
///
/// Returns the underlying database error.
pub async fn append_exchange(
    conn: &mut sqlx::PgConnection,
    user_id: Uuid,
    platform: Platform,
    prompt: &str,
    response: &str,
) -> Result<ChatExchange, sqlx::Error> {
    sqlx::query_as::<_, ChatExchange>(
        "INSERT INTO chat_exchanges (user_id, prompt, response, model_name)
         VALUES ($1, $2, $3, $4)
         RETURNING id, user_id, prompt, response, model_name, created_at",
    )
    .bind(user_id)
    .bind(prompt)
    .bind(response)
    .bind(platform.as_str())
    .fetch_one(conn)
    .await
}

/// Exchanges matching both user and platform, in insertion order. Empty vec
/// when none match.
///
/// # Errors
///
/// Returns the underlying database error.
pub async fn chat_history(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
) -> Result<Vec<ChatExchange>, sqlx::Error> {
    sqlx::query_as::<_, ChatExchange>(
        "SELECT id, user_id, prompt, response, model_name, created_at
         FROM chat_exchanges
         WHERE user_id = $1 AND model_name = $2
         ORDER BY id",
    )
    .bind(user_id)
    .bind(platform.as_str())
    .fetch_all(pool)
    .await
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
