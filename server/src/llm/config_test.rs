use super::*;

#[test]
fn provider_defaults_to_anthropic() {
    assert_eq!(parse_provider(None).expect("provider"), LlmProviderKind::Anthropic);
}

#[test]
fn provider_parses_known_names() {
    assert_eq!(parse_provider(Some("anthropic")).expect("provider"), LlmProviderKind::Anthropic);
    assert_eq!(parse_provider(Some("openai")).expect("provider"), LlmProviderKind::OpenAi);
}

#[test]
fn provider_rejects_unknown_names() {
    let err = parse_provider(Some("hal9000")).expect_err("unknown provider");
    assert!(matches!(err, LlmError::ConfigParse(_)));
}

#[test]
fn each_provider_has_a_default_model() {
    assert!(!default_model(LlmProviderKind::Anthropic).is_empty());
    assert!(!default_model(LlmProviderKind::OpenAi).is_empty());
    assert_ne!(default_model(LlmProviderKind::Anthropic), default_model(LlmProviderKind::OpenAi));
}
