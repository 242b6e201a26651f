//! Quota ledger — per-user lifetime cap on successful AI requests.
//!
//! DESIGN
//! ======
//! The counter on the user row is the source of truth; history is never
//! recounted at runtime. `check_usage` is the pure pre-call gate (fail fast
//! before paying for a provider call). `commit_usage` is the enforcement: a
//! single conditional increment executed inside the same transaction as the
//! transcript append, so two in-flight requests that both passed the
//! pre-check cannot both consume the last slot — the loser's update matches
//! no row and the caller rolls back.

use sqlx::PgPool;
use uuid::Uuid;

/// Sentinel `remaining` for unlimited accounts. Never a real count.
pub const UNLIMITED_REMAINING: i64 = -1;

pub const DEFAULT_USAGE_LIMIT: i64 = 20;

// =============================================================================
// TYPES
// =============================================================================

/// The slice of the account row the chat backend consumes. Created and
/// destroyed by the account subsystem; only the quota columns are mutated
/// here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub ai_requests_count: i32,
    pub is_unlimited: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageStatus {
    pub allowed: bool,
    /// Requests left before the cap, or [`UNLIMITED_REMAINING`].
    pub remaining: i64,
}

// =============================================================================
// LEDGER
// =============================================================================

/// Pre-call quota gate. Unlimited accounts always pass with the sentinel.
#[must_use]
pub fn check_usage(user: &User, limit: i64) -> UsageStatus {
    if user.is_unlimited {
        return UsageStatus { allowed: true, remaining: UNLIMITED_REMAINING };
    }
    let remaining = (limit - i64::from(user.ai_requests_count)).max(0);
    UsageStatus { allowed: remaining > 0, remaining }
}

/// Conditionally consume one quota unit. Call inside the transaction that
/// appends the exchange, after a successful provider response.
///
/// Returns the post-commit `remaining` (sentinel for unlimited accounts), or
/// `None` when the cap was already consumed — the caller must roll back.
///
/// # Errors
///
/// Returns the underlying database error.
pub async fn commit_usage(
    conn: &mut sqlx::PgConnection,
    user_id: Uuid,
    limit: i64,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(bool, i32)> = sqlx::query_as(
        "UPDATE users
         SET ai_requests_count = CASE WHEN is_unlimited THEN ai_requests_count ELSE ai_requests_count + 1 END
         WHERE id = $1 AND (is_unlimited OR ai_requests_count < $2)
         RETURNING is_unlimited, ai_requests_count",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|(is_unlimited, count)| {
        if is_unlimited { UNLIMITED_REMAINING } else { (limit - i64::from(count)).max(0) }
    }))
}

// =============================================================================
// ROW ACCESS
// =============================================================================

/// Look up a user by the email carried in a verified token.
///
/// # Errors
///
/// Returns the underlying database error.
pub async fn fetch_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, email, ai_requests_count, is_unlimited FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Fresh read of the session user's row (quota state must not come from the
/// session-scoped copy).
///
/// # Errors
///
/// Returns the underlying database error.
pub async fn fetch_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, email, ai_requests_count, is_unlimited FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
#[path = "usage_test.rs"]
mod tests;
