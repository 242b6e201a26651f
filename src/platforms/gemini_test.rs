use super::*;

fn test_client(api_key: &str) -> GeminiClient {
    GeminiClient::new(api_key.into(), "gemini-2.0-flash".into(), PlatformTimeouts::default(), "GEMINI_API_KEY")
        .unwrap()
}

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_extracts_candidate_text() {
    let json = r#"{
        "candidates": [{
            "content": {
                "parts": [{"text": "Hello from Gemini."}],
                "role": "model"
            },
            "finishReason": "STOP"
        }],
        "modelVersion": "gemini-2.0-flash"
    }"#;
    assert_eq!(parse_response(json).unwrap(), "Hello from Gemini.");
}

#[test]
fn parse_concatenates_multiple_parts() {
    let json = r#"{
        "candidates": [{
            "content": {"parts": [{"text": "part one "}, {"text": "part two"}]}
        }]
    }"#;
    assert_eq!(parse_response(json).unwrap(), "part one part two");
}

#[test]
fn parse_uses_first_candidate_only() {
    let json = r#"{
        "candidates": [
            {"content": {"parts": [{"text": "first"}]}},
            {"content": {"parts": [{"text": "second"}]}}
        ]
    }"#;
    assert_eq!(parse_response(json).unwrap(), "first");
}

#[test]
fn parse_no_candidates_is_error() {
    let err = parse_response(r#"{"candidates": []}"#).unwrap_err();
    assert!(matches!(err, PlatformError::ApiParse(_)));
    assert!(err.to_string().contains("no candidates"));
}

#[test]
fn parse_missing_candidates_field_is_error() {
    let err = parse_response("{}").unwrap_err();
    assert!(err.to_string().contains("no candidates"));
}

#[test]
fn parse_empty_text_is_error() {
    let json = r#"{"candidates": [{"content": {"parts": []}}]}"#;
    let err = parse_response(json).unwrap_err();
    assert!(err.to_string().contains("no text"));
}

#[test]
fn parse_invalid_json_is_error() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, PlatformError::ApiParse(_)));
}

// =============================================================================
// request body shape
// =============================================================================

#[test]
fn request_body_matches_generate_content_schema() {
    let body = ApiRequest { contents: [RequestContent { parts: [RequestPart { text: "hi" }] }] };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json, serde_json::json!({"contents": [{"parts": [{"text": "hi"}]}]}));
}

// =============================================================================
// key handling
// =============================================================================

#[tokio::test]
async fn chat_without_key_fails_before_any_request() {
    let client = test_client("");
    let err = client.chat("hello").await.unwrap_err();
    assert!(matches!(err, PlatformError::MissingApiKey { ref var } if var == "GEMINI_API_KEY"));
}
