use super::*;

const SAMPLE: &str = r#"{
    "choices": [
        {"message": {"content": "A desert epic."}, "finish_reason": "stop"}
    ],
    "model": "gpt-4o-mini",
    "usage": {"prompt_tokens": 42, "completion_tokens": 7}
}"#;

#[test]
fn parse_response_maps_first_choice() {
    let response = parse_response(SAMPLE).expect("response");
    assert_eq!(response.content.len(), 1);
    assert!(matches!(&response.content[0], ContentBlock::Text { text } if text == "A desert epic."));
    assert_eq!(response.model, "gpt-4o-mini");
    assert_eq!(response.stop_reason, "stop");
    assert_eq!(response.input_tokens, 42);
    assert_eq!(response.output_tokens, 7);
}

#[test]
fn parse_response_rejects_empty_choices() {
    let json = r#"{"choices": [], "model": "m", "usage": {"prompt_tokens": 0, "completion_tokens": 0}}"#;
    let err = parse_response(json).expect_err("no choices");
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[test]
fn parse_response_tolerates_null_content() {
    let json = r#"{
        "choices": [{"message": {"content": null}, "finish_reason": "length"}],
        "model": "m",
        "usage": {"prompt_tokens": 1, "completion_tokens": 0}
    }"#;
    let response = parse_response(json).expect("response");
    assert!(response.content.is_empty());
    assert_eq!(response.stop_reason, "length");
}

#[test]
fn build_request_prepends_the_system_message() {
    let messages = [Message { role: "user".to_owned(), content: Content::Text("hi".to_owned()) }];
    let body = build_request("gpt-4o-mini", 100, "be brief", &messages);

    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 100);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "be brief");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "hi");
}

#[test]
fn content_to_text_joins_text_blocks_only() {
    let content = Content::Blocks(vec![
        ContentBlock::Text { text: "one".to_owned() },
        ContentBlock::Thinking { thinking: "skip".to_owned() },
        ContentBlock::Text { text: "two".to_owned() },
    ]);
    assert_eq!(content_to_text(&content), "one\ntwo");
}
