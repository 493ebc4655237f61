use super::*;

#[test]
fn default_has_no_notice() {
    assert!(UiState::default().notice.is_none());
}

#[test]
fn set_notice_replaces_existing() {
    let mut ui = UiState::default();
    ui.set_notice("first");
    ui.set_notice("second");
    assert_eq!(ui.notice.as_deref(), Some("second"));
}

#[test]
fn clear_notice_dismisses() {
    let mut ui = UiState::default();
    ui.set_notice("oops");
    ui.clear_notice();
    assert!(ui.notice.is_none());
}
