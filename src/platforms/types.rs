//! Platform types — the closed provider set and gateway errors.
//!
//! `Platform` is the deploy-time enumeration exposed at `/ai/platforms` and
//! accepted as `model_name` on the wire. `PlatformChat` is the capability
//! every vendor client implements; it is a trait so tests can script
//! responses without network access.

use serde::{Deserialize, Serialize};

// =============================================================================
// PLATFORM ENUM
// =============================================================================

/// Supported AI backends. The set is fixed at deploy time; wire names are
/// the lowercase variants ("gemini", "groq").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Gemini,
    Groq,
}

impl Platform {
    /// Every platform, in the order reported by `/ai/platforms`.
    pub const ALL: [Platform; 2] = [Platform::Gemini, Platform::Groq];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Gemini => "gemini",
            Platform::Groq => "groq",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Platform::Gemini),
            "groq" => Ok(Platform::Groq),
            other => Err(PlatformError::ConfigParse(format!("unknown platform: {other}"))),
        }
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by gateway configuration and vendor client calls.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The platform's API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the vendor failed before a response arrived.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The vendor returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The vendor response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// PLATFORM CHAT TRAIT
// =============================================================================

/// Vendor-neutral async trait for one-shot text generation. Enables mocking
/// in tests. The prompt passed here is final — any system preamble has
/// already been composed by the registry.
#[async_trait::async_trait]
pub trait PlatformChat: Send + Sync {
    /// Send a prompt to the vendor and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns a [`PlatformError`] if the key is absent, the request fails,
    /// or the response is malformed.
    async fn chat(&self, prompt: &str) -> Result<String, PlatformError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
