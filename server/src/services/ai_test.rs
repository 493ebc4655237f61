use super::*;

fn response_with(content: Vec<ContentBlock>) -> ChatResponse {
    ChatResponse {
        content,
        model: "test-model".to_owned(),
        stop_reason: "end_turn".to_owned(),
        input_tokens: 10,
        output_tokens: 20,
    }
}

#[test]
fn prompt_names_title_and_author() {
    let prompt = description_prompt("Dune", "Frank Herbert");
    assert!(prompt.contains("Dune"));
    assert!(prompt.contains("Frank Herbert"));
}

#[test]
fn extract_text_returns_trimmed_first_text_block() {
    let response = response_with(vec![ContentBlock::Text {
        text: "  A desert epic.  ".to_owned(),
    }]);
    assert_eq!(extract_text(&response).as_deref(), Some("A desert epic."));
}

#[test]
fn extract_text_skips_thinking_blocks() {
    let response = response_with(vec![
        ContentBlock::Thinking { thinking: "hmm".to_owned() },
        ContentBlock::Text { text: "A desert epic.".to_owned() },
    ]);
    assert_eq!(extract_text(&response).as_deref(), Some("A desert epic."));
}

#[test]
fn extract_text_rejects_empty_responses() {
    assert!(extract_text(&response_with(vec![])).is_none());
    assert!(
        extract_text(&response_with(vec![ContentBlock::Text { text: "   ".to_owned() }])).is_none()
    );
}

#[tokio::test]
async fn draft_description_uses_the_mock_llm() {
    struct MockLlm;

    #[async_trait::async_trait]
    impl LlmChat for MockLlm {
        async fn chat(
            &self,
            _max_tokens: u32,
            _system: &str,
            messages: &[Message],
        ) -> Result<ChatResponse, LlmError> {
            assert_eq!(messages.len(), 1);
            Ok(ChatResponse {
                content: vec![ContentBlock::Text { text: "A desert epic.".to_owned() }],
                model: "mock".to_owned(),
                stop_reason: "end_turn".to_owned(),
                input_tokens: 1,
                output_tokens: 1,
            })
        }
    }

    let description = draft_description(&MockLlm, "Dune", "Frank Herbert")
        .await
        .expect("description");
    assert_eq!(description, "A desert epic.");
}
