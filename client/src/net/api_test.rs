use super::*;

#[test]
fn profile_endpoint_embeds_user_id() {
    assert_eq!(profile_endpoint("u-123"), "/api/users/u-123/profile");
}

#[test]
fn admin_endpoint_embeds_user_id() {
    assert_eq!(admin_endpoint("u-123"), "/api/admins/u-123");
}

#[test]
fn book_endpoint_embeds_book_id() {
    assert_eq!(book_endpoint("b-9"), "/api/books/b-9");
}

#[test]
fn isbn_endpoint_embeds_isbn() {
    assert_eq!(isbn_endpoint("9780441013593"), "/api/isbn/9780441013593");
}

#[test]
fn failure_messages_carry_status() {
    assert_eq!(ticket_request_failed_message(503), "ticket request failed: 503");
    assert_eq!(request_code_failed_message(400), "request code failed: 400");
    assert_eq!(verify_code_failed_message(401), "verify code failed: 401");
}
