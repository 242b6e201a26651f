use super::*;

// =============================================================================
// WIRE NAMES
// =============================================================================

#[test]
fn platform_serializes_to_lowercase_wire_names() {
    assert_eq!(serde_json::to_string(&Platform::Gemini).unwrap(), "\"gemini\"");
    assert_eq!(serde_json::to_string(&Platform::Groq).unwrap(), "\"groq\"");
}

#[test]
fn platform_deserializes_from_wire_names() {
    let p: Platform = serde_json::from_str("\"gemini\"").unwrap();
    assert_eq!(p, Platform::Gemini);
    let p: Platform = serde_json::from_str("\"groq\"").unwrap();
    assert_eq!(p, Platform::Groq);
}

#[test]
fn platform_rejects_unknown_wire_name() {
    let result: Result<Platform, _> = serde_json::from_str("\"chatgpt\"");
    assert!(result.is_err());
}

#[test]
fn platform_from_str_matches_as_str() {
    for platform in Platform::ALL {
        let parsed: Platform = platform.as_str().parse().unwrap();
        assert_eq!(parsed, platform);
    }
}

#[test]
fn platform_from_str_rejects_unknown() {
    let err = "llama".parse::<Platform>().unwrap_err();
    assert!(err.to_string().contains("unknown platform: llama"));
}

#[test]
fn platform_all_covers_both_vendors() {
    assert_eq!(Platform::ALL.len(), 2);
    assert!(Platform::ALL.contains(&Platform::Gemini));
    assert!(Platform::ALL.contains(&Platform::Groq));
}

#[test]
fn platform_display_matches_wire_name() {
    assert_eq!(Platform::Gemini.to_string(), "gemini");
    assert_eq!(Platform::Groq.to_string(), "groq");
}

// =============================================================================
// ERROR DISPLAY
// =============================================================================

#[test]
fn missing_api_key_names_env_var() {
    let err = PlatformError::MissingApiKey { var: "GEMINI_API_KEY".into() };
    assert_eq!(err.to_string(), "missing API key: env var GEMINI_API_KEY not set");
}

#[test]
fn api_response_error_includes_status() {
    let err = PlatformError::ApiResponse { status: 429, body: "rate limited".into() };
    assert!(err.to_string().contains("429"));
}
