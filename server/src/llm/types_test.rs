use super::*;

#[test]
fn text_block_round_trips() {
    let block = ContentBlock::Text { text: "hello".to_owned() };
    let json = serde_json::to_string(&block).unwrap();
    assert!(json.contains(r#""type":"text""#));

    let restored: ContentBlock = serde_json::from_str(&json).unwrap();
    assert!(matches!(restored, ContentBlock::Text { text } if text == "hello"));
}

#[test]
fn unknown_block_types_deserialize_to_unknown() {
    let restored: ContentBlock =
        serde_json::from_str(r#"{"type":"tool_use","id":"x","name":"y"}"#).unwrap();
    assert!(matches!(restored, ContentBlock::Unknown));
}

#[test]
fn content_accepts_plain_string() {
    let content: Content = serde_json::from_str(r#""just text""#).unwrap();
    assert!(matches!(content, Content::Text(t) if t == "just text"));
}

#[test]
fn content_accepts_block_arrays() {
    let content: Content = serde_json::from_str(r#"[{"type":"text","text":"hi"}]"#).unwrap();
    assert!(matches!(content, Content::Blocks(blocks) if blocks.len() == 1));
}

#[test]
fn transport_errors_are_retryable() {
    assert!(LlmError::ApiRequest("timeout".to_owned()).retryable());
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn client_errors_are_not_retryable() {
    assert!(!LlmError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!LlmError::ConfigParse("bad".to_owned()).retryable());
    assert!(!LlmError::MissingApiKey { var: "K".to_owned() }.retryable());
}
