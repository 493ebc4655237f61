use super::*;

#[test]
fn storage_key_applies_app_prefix() {
    assert_eq!(storage_key("add_book_draft"), "stacks.add_book_draft");
}

#[test]
fn app_keys_are_recognized_by_prefix() {
    assert!(is_app_key("stacks.add_book_draft"));
    assert!(is_app_key(&storage_key("anything")));
}

#[test]
fn foreign_keys_are_left_alone() {
    assert!(!is_app_key("other_app.setting"));
    assert!(!is_app_key("stacks"));
}
