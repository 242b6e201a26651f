//! Google Gemini `generateContent` client.
//!
//! Thin HTTP wrapper over the v1beta REST endpoint. Pure parsing in
//! `parse_response` for testability. The API key is checked at call time so
//! an unconfigured vendor surfaces as a per-request provider error rather
//! than a startup failure.

use std::time::Duration;

use super::config::PlatformTimeouts;
use super::types::{PlatformChat, PlatformError};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    key_var: &'static str,
}

impl GeminiClient {
    /// Build a Gemini client. `api_key` may be empty; requests then fail
    /// with [`PlatformError::MissingApiKey`] naming `key_var`.
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
impl PlatformChat for GeminiClient {
    async fn chat(&self, prompt: &str) -> Result<String, PlatformError> {
        if self.api_key.is_empty() {
            return Err(PlatformError::MissingApiKey { var: self.key_var.to_owned() });
        }

        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = ApiRequest { contents: [RequestContent { parts: [RequestPart { text: prompt }] }] };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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
    contents: [RequestContent<'a>; 1],
}

#[derive(serde::Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(serde::Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(serde::Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<String, PlatformError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| PlatformError::ApiParse(e.to_string()))?;

    let Some(candidate) = api.candidates.into_iter().next() else {
        return Err(PlatformError::ApiParse("no candidates in response".into()));
    };

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect();

    if text.is_empty() {
        return Err(PlatformError::ApiParse("response contained no text".into()));
    }

    Ok(text)
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
