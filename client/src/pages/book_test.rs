use super::*;

// =============================================================================
// render_markdown
// =============================================================================

#[test]
fn markdown_renders_emphasis() {
    let html = render_markdown("a *great* read");
    assert!(html.contains("<em>great</em>"));
}

#[test]
fn markdown_renders_plain_text_as_paragraph() {
    let html = render_markdown("loved it");
    assert!(html.contains("<p>loved it</p>"));
}

#[test]
fn markdown_escapes_raw_angle_brackets_in_text() {
    let html = render_markdown("5 < 7");
    assert!(html.contains("&lt;"));
}

// =============================================================================
// lending permissions
// =============================================================================

#[test]
fn available_book_cannot_be_returned() {
    assert!(!can_return(None, Some("u1"), false));
    assert!(!can_return(None, Some("u1"), true));
}

#[test]
fn borrower_may_return() {
    assert!(can_return(Some("u1"), Some("u1"), false));
}

#[test]
fn stranger_may_not_return() {
    assert!(!can_return(Some("u1"), Some("u2"), false));
    assert!(!can_return(Some("u1"), None, false));
}

#[test]
fn admin_may_return_on_behalf() {
    assert!(can_return(Some("u1"), Some("u2"), true));
}

#[test]
fn adder_may_delete() {
    assert!(can_delete(Some("u1"), Some("u1"), false));
}

#[test]
fn stranger_may_not_delete() {
    assert!(!can_delete(Some("u1"), Some("u2"), false));
    assert!(!can_delete(None, Some("u2"), false));
}

#[test]
fn admin_may_always_delete() {
    assert!(can_delete(Some("u1"), Some("u2"), true));
    assert!(can_delete(None, None, true));
}
