use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// token / ticket generation
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

#[test]
fn generate_ws_ticket_is_32_hex_chars() {
    let ticket = generate_ws_ticket();
    assert_eq!(ticket.len(), 32);
    assert!(ticket.chars().all(|c| c.is_ascii_hexdigit()));
}

// =============================================================================
// refresh window
// =============================================================================

#[test]
fn session_far_from_expiry_is_not_refreshed() {
    let now = OffsetDateTime::now_utc();
    assert!(!needs_refresh(now + time::Duration::days(20), now));
}

#[test]
fn session_inside_refresh_window_is_refreshed() {
    let now = OffsetDateTime::now_utc();
    assert!(needs_refresh(now + time::Duration::days(3), now));
}

#[test]
fn expired_session_counts_as_stale() {
    let now = OffsetDateTime::now_utc();
    assert!(needs_refresh(now - time::Duration::days(1), now));
}

// =============================================================================
// event rows
// =============================================================================

#[test]
fn session_event_row_never_contains_the_token() {
    let user_id = Uuid::new_v4();
    let row = session_event_row(user_id, "alice@example.com", OffsetDateTime::now_utc());
    assert_eq!(row["user_id"], user_id.to_string());
    assert_eq!(row["email"], "alice@example.com");
    assert!(row.get("token").is_none());
}

#[test]
fn session_event_row_formats_expiry_as_rfc3339() {
    let row = session_event_row(Uuid::nil(), "a@b.c", OffsetDateTime::UNIX_EPOCH);
    assert_eq!(row["expires_at"], "1970-01-01T00:00:00Z");
}

#[test]
fn session_user_serializes_id_and_email() {
    let user = SessionUser { id: Uuid::nil(), email: "alice@example.com".into() };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["id"], Uuid::nil().to_string());
}
