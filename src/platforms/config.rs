//! Gateway configuration from environment variables.
//!
//! Vendor API keys are read here but validated only at call time, so a
//! missing key never prevents startup and the platform enumeration stays
//! complete. The disabled set is parsed strictly: a typo in
//! `AI_DISABLED_PLATFORMS` is a startup error, not a silently-enabled
//! platform.

use std::collections::HashSet;

use super::types::{Platform, PlatformError};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";
const GROQ_KEY_VAR: &str = "GROQ_API_KEY";

// =============================================================================
// TYPES
// =============================================================================

/// HTTP timeouts applied to every vendor client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for PlatformTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Parsed gateway configuration for all platforms.
#[derive(Debug, Clone)]
pub struct PlatformsConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub groq_api_key: String,
    pub groq_model: String,
    /// Platforms statically disabled at deploy time.
    pub disabled: HashSet<Platform>,
    /// Optional system preamble composed ahead of every prompt.
    pub system_preamble: Option<String>,
    pub timeouts: PlatformTimeouts,
}

impl PlatformsConfig {
    /// Read gateway configuration from the environment.
    ///
    /// - `GEMINI_API_KEY` / `GROQ_API_KEY`: vendor credentials (may be unset)
    /// - `GEMINI_MODEL` / `GROQ_MODEL`: model overrides
    /// - `AI_DISABLED_PLATFORMS`: comma-separated wire names
    /// - `AI_SYSTEM_PROMPT`: preamble prefixed to every prompt
    /// - `AI_REQUEST_TIMEOUT_SECS` / `AI_CONNECT_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::ConfigParse`] on an unknown platform name in
    /// the disabled list or a malformed timeout value.
    pub fn from_env() -> Result<Self, PlatformError> {
        let disabled = parse_disabled_list(&env_string("AI_DISABLED_PLATFORMS").unwrap_or_default())?;

        let system_preamble = env_string("AI_SYSTEM_PROMPT");

        let timeouts = PlatformTimeouts {
            request_secs: env_u64("AI_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_u64("AI_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self {
            gemini_api_key: env_string(GEMINI_KEY_VAR).unwrap_or_default(),
            gemini_model: env_string("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            groq_api_key: env_string(GROQ_KEY_VAR).unwrap_or_default(),
            groq_model: env_string("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.into()),
            disabled,
            system_preamble,
            timeouts,
        })
    }

    #[must_use]
    pub fn key_var(platform: Platform) -> &'static str {
        match platform {
            Platform::Gemini => GEMINI_KEY_VAR,
            Platform::Groq => GROQ_KEY_VAR,
        }
    }
}

// =============================================================================
// PARSING HELPERS
// =============================================================================

/// Parse a comma-separated list of platform wire names.
pub(super) fn parse_disabled_list(raw: &str) -> Result<HashSet<Platform>, PlatformError> {
    let mut disabled = HashSet::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        disabled.insert(entry.parse::<Platform>()?);
    }
    Ok(disabled)
}

/// Non-empty env string, trimmed of surrounding whitespace.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str, default: u64) -> Result<u64, PlatformError> {
    match env_string(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| PlatformError::ConfigParse(format!("{key}: {e}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
