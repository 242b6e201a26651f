//! Groq chat-completions client (OpenAI-compatible API).
//!
//! Same shape as the Gemini client: thin HTTP wrapper, pure `parse_response`,
//! call-time key check.

use std::time::Duration;

use super::config::PlatformTimeouts;
use super::types::{PlatformChat, PlatformError};

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    key_var: &'static str,
}

impl GroqClient {
    /// Build a Groq client. `api_key` may be empty; requests then fail with
    /// [`PlatformError::MissingApiKey`] naming `key_var`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        api_key: String,
        model: String,
        timeouts: PlatformTimeouts,
        key_var: &'static str,
    ) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| PlatformError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, model, key_var })
    }
}

#[async_trait::async_trait]
impl PlatformChat for GroqClient {
    async fn chat(&self, prompt: &str) -> Result<String, PlatformError> {
        if self.api_key.is_empty() {
            return Err(PlatformError::MissingApiKey { var: self.key_var.to_owned() });
        }

        let body = ApiRequest {
            model: &self.model,
            messages: [RequestMessage { role: "user", content: prompt }],
        };

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PlatformError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(PlatformError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 1],
}

#[derive(serde::Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<String, PlatformError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| PlatformError::ApiParse(e.to_string()))?;

    let Some(choice) = api.choices.into_iter().next() else {
        return Err(PlatformError::ApiParse("no choices in response".into()));
    };

    if choice.message.content.is_empty() {
        return Err(PlatformError::ApiParse("response contained no text".into()));
    }

    Ok(choice.message.content)
}

#[cfg(test)]
#[path = "groq_test.rs"]
mod tests;
