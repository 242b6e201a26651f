use super::*;

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_extracts_choice_content() {
    let json = r#"{
        "id": "chatcmpl-abc123",
        "object": "chat.completion",
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hello from Groq."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 4, "completion_tokens": 5, "total_tokens": 9}
    }"#;
    assert_eq!(parse_response(json).unwrap(), "Hello from Groq.");
}

#[test]
fn parse_uses_first_choice_only() {
    let json = r#"{
        "choices": [
            {"message": {"role": "assistant", "content": "first"}},
            {"message": {"role": "assistant", "content": "second"}}
        ]
    }"#;
    assert_eq!(parse_response(json).unwrap(), "first");
}

#[test]
fn parse_no_choices_is_error() {
    let err = parse_response(r#"{"choices": []}"#).unwrap_err();
    assert!(err.to_string().contains("no choices"));
}

#[test]
fn parse_empty_content_is_error() {
    let json = r#"{"choices": [{"message": {"role": "assistant"}}]}"#;
    let err = parse_response(json).unwrap_err();
    assert!(err.to_string().contains("no text"));
}

#[test]
fn parse_invalid_json_is_error() {
    let err = parse_response("[1, 2").unwrap_err();
    assert!(matches!(err, PlatformError::ApiParse(_)));
}

// =============================================================================
// request body shape
// =============================================================================

#[test]
fn request_body_matches_chat_completions_schema() {
    let body = ApiRequest {
        model: "llama-3.3-70b-versatile",
        messages: [RequestMessage { role: "user", content: "hi" }],
    };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "model": "llama-3.3-70b-versatile",
            "messages": [{"role": "user", "content": "hi"}]
        })
    );
}

// =============================================================================
// key handling
// =============================================================================

#[tokio::test]
async fn chat_without_key_fails_before_any_request() {
    let client =
        GroqClient::new(String::new(), "llama-3.3-70b-versatile".into(), PlatformTimeouts::default(), "GROQ_API_KEY")
            .unwrap();
    let err = client.chat("hello").await.unwrap_err();
    assert!(matches!(err, PlatformError::MissingApiKey { ref var } if var == "GROQ_API_KEY"));
}
