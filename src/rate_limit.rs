//! In-memory rate limiting for chat messages.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<Uuid, VecDeque<Instant>>`,
//! keyed by authenticated user id — not by connection, so two sessions
//! authenticated as the same user are throttled jointly. One process-wide
//! instance is constructed at startup and shared through `AppState`.
//!
//! This limiter gates message bursts inside short windows; the lifetime cap
//! lives in the quota ledger. Both must pass for a request to proceed.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

const DEFAULT_TIMES: usize = 5;
const DEFAULT_WINDOW_SECS: u64 = 60;

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Messages allowed per identity within one window.
    pub times: usize,
    pub window: Duration,
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            times: env_parse("RATE_LIMIT_TIMES", DEFAULT_TIMES),
            window: Duration::from_secs(env_parse("RATE_LIMIT_WINDOW_SECS", DEFAULT_WINDOW_SECS)),
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit exceeded (max {limit} messages/{window_secs}s)")]
    Exceeded { limit: usize, window_secs: u64 },
}

impl RateLimitError {
    /// Seconds the client is told to wait before retrying.
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            RateLimitError::Exceeded { window_secs, .. } => *window_secs,
        }
    }
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<Uuid, VecDeque<Instant>>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Limiter configured from `RATE_LIMIT_TIMES` / `RATE_LIMIT_WINDOW_SECS`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RateLimitConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: RateLimitConfig) -> Self {
        Self { inner: Arc::new(Mutex::new(HashMap::new())), config }
    }

    /// Check the identity's window and record the message on success.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::Exceeded`] when the window is full; nothing
    /// is recorded in that case.
    pub fn check_and_record(&self, user_id: Uuid) -> Result<(), RateLimitError> {
        self.check_and_record_at(user_id, Instant::now())
    }

    /// Internal: check + record with explicit timestamp (for testing).
    fn check_and_record_at(&self, user_id: Uuid, now: Instant) -> Result<(), RateLimitError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let deque = inner.entry(user_id).or_default();
        prune_window(deque, now, self.config.window);
        if deque.len() >= self.config.times {
            return Err(RateLimitError::Exceeded {
                limit: self.config.times,
                window_secs: self.config.window.as_secs(),
            });
        }

        deque.push_back(now);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
