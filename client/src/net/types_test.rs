use super::*;

#[test]
fn session_round_trips_through_json() {
    let session = Session {
        user: User { id: "u1".to_owned(), email: "alice@example.com".to_owned() },
        expires_at: Some("2026-09-01T00:00:00Z".to_owned()),
    };
    let json = serde_json::to_string(&session).unwrap();
    let restored: Session = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, session);
}

#[test]
fn session_accepts_null_expiry() {
    let session: Session =
        serde_json::from_str(r#"{"user":{"id":"u1","email":"a@b.c"},"expires_at":null}"#).unwrap();
    assert!(session.expires_at.is_none());
}

#[test]
fn profile_row_parses_server_payload() {
    let row: ProfileRow = serde_json::from_str(
        r#"{"user_id":"u1","display_name":"Alice","avatar_url":null,"is_approved":true}"#,
    )
    .unwrap();
    assert!(row.is_approved);
    assert_eq!(row.display_name.as_deref(), Some("Alice"));
}

#[test]
fn book_rating_count_defaults_to_zero() {
    let book: Book = serde_json::from_str(
        r#"{
            "id":"b1","title":"Dune","author":"Frank Herbert",
            "isbn":null,"description":null,"cover_url":null,
            "added_by":null,"borrowed_by":null,"borrowed_at":null,
            "created_at":"2026-08-01T00:00:00Z","rating_avg":null
        }"#,
    )
    .unwrap();
    assert_eq!(book.rating_count, 0);
    assert!(book.rating_avg.is_none());
}

#[test]
fn book_draft_serializes_optional_fields() {
    let draft = BookDraft {
        title: "Dune".to_owned(),
        author: "Frank Herbert".to_owned(),
        isbn: Some("9780441013593".to_owned()),
        description: None,
        cover_url: None,
    };
    let json: serde_json::Value = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["isbn"], "9780441013593");
    assert_eq!(json["description"], serde_json::Value::Null);
}

#[test]
fn admin_membership_parses_flag() {
    let membership: AdminMembership = serde_json::from_str(r#"{"is_admin":true}"#).unwrap();
    assert!(membership.is_admin);
}
