//! Platforms — multi-vendor gateway for AI chat backends.
//!
//! DESIGN
//! ======
//! A closed set of vendor clients behind one capability trait. The registry
//! owns one client per [`Platform`] variant plus the deploy-time disabled
//! set and the optional system preamble. Availability is a pure lookup; the
//! pipeline checks it before quota or rate-limit logic so a disabled
//! platform fails fast and uniformly for every caller.

pub mod config;
pub mod gemini;
pub mod groq;
pub mod types;

use std::collections::HashSet;
use std::sync::Arc;

use config::PlatformsConfig;
pub use types::{Platform, PlatformChat, PlatformError};

// =============================================================================
// REGISTRY
// =============================================================================

/// One client per platform, with static availability and preamble
/// composition. Constructed once at startup; construction never depends on
/// vendor credentials being present.
pub struct PlatformRegistry {
    gemini: Arc<dyn PlatformChat>,
    groq: Arc<dyn PlatformChat>,
    disabled: HashSet<Platform>,
    system_preamble: Option<String>,
}

impl PlatformRegistry {
    /// Build the registry from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed configuration or if an HTTP client
    /// fails to build. Missing API keys are not an error here.
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::from_config(PlatformsConfig::from_env()?)
    }

    /// Build the registry from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if a vendor HTTP client fails to build.
    pub fn from_config(config: PlatformsConfig) -> Result<Self, PlatformError> {
        let gemini = gemini::GeminiClient::new(
            config.gemini_api_key,
            config.gemini_model,
            config.timeouts,
            PlatformsConfig::key_var(Platform::Gemini),
        )?;
        let groq = groq::GroqClient::new(
            config.groq_api_key,
            config.groq_model,
            config.timeouts,
            PlatformsConfig::key_var(Platform::Groq),
        )?;

        Ok(Self {
            gemini: Arc::new(gemini),
            groq: Arc::new(groq),
            disabled: config.disabled,
            system_preamble: config.system_preamble,
        })
    }

    /// Build a registry over arbitrary backends (mocks in tests).
    #[must_use]
    pub fn with_backends(gemini: Arc<dyn PlatformChat>, groq: Arc<dyn PlatformChat>) -> Self {
        Self { gemini, groq, disabled: HashSet::new(), system_preamble: None }
    }

    #[must_use]
    pub fn with_disabled(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.disabled.extend(platforms);
        self
    }

    #[must_use]
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.system_preamble = Some(preamble.into());
        self
    }

    /// Static availability lookup. Independent of runtime vendor health.
    #[must_use]
    pub fn is_available(&self, platform: Platform) -> bool {
        !self.disabled.contains(&platform)
    }

    /// Dispatch a prompt to the platform's client, composing the system
    /// preamble first when one is configured.
    ///
    /// # Errors
    ///
    /// Returns the vendor client's [`PlatformError`] unchanged.
    pub async fn chat(&self, platform: Platform, prompt: &str) -> Result<String, PlatformError> {
        let backend = self.backend(platform);
        match &self.system_preamble {
            Some(preamble) => backend.chat(&format!("{preamble}\n\n{prompt}")).await,
            None => backend.chat(prompt).await,
        }
    }

    fn backend(&self, platform: Platform) -> &dyn PlatformChat {
        match platform {
            Platform::Gemini => self.gemini.as_ref(),
            Platform::Groq => self.groq.as_ref(),
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
