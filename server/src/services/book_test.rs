use super::*;

// =============================================================================
// permission helpers
// =============================================================================

#[test]
fn adder_may_delete_their_book() {
    let user = Uuid::new_v4();
    assert!(may_delete(Some(user), user, false));
}

#[test]
fn stranger_may_not_delete() {
    assert!(!may_delete(Some(Uuid::new_v4()), Uuid::new_v4(), false));
    assert!(!may_delete(None, Uuid::new_v4(), false));
}

#[test]
fn admin_may_delete_anything() {
    assert!(may_delete(Some(Uuid::new_v4()), Uuid::new_v4(), true));
    assert!(may_delete(None, Uuid::new_v4(), true));
}

#[test]
fn borrower_may_return() {
    let user = Uuid::new_v4();
    assert!(may_return(user, user, false));
}

#[test]
fn stranger_may_not_return() {
    assert!(!may_return(Uuid::new_v4(), Uuid::new_v4(), false));
}

#[test]
fn admin_may_return_on_behalf() {
    assert!(may_return(Uuid::new_v4(), Uuid::new_v4(), true));
}

// =============================================================================
// rating validation
// =============================================================================

#[test]
fn stars_within_range_are_accepted() {
    for stars in 1..=5 {
        assert!(validate_stars(stars).is_ok());
    }
}

#[test]
fn stars_out_of_range_are_rejected() {
    assert!(matches!(validate_stars(0), Err(BookError::InvalidRating(0))));
    assert!(matches!(validate_stars(6), Err(BookError::InvalidRating(6))));
    assert!(matches!(validate_stars(-3), Err(BookError::InvalidRating(-3))));
}

// =============================================================================
// serialization
// =============================================================================

#[test]
fn book_record_serializes_to_the_client_schema() {
    let record = BookRecord {
        id: Uuid::nil(),
        title: "Dune".to_owned(),
        author: "Frank Herbert".to_owned(),
        isbn: Some("9780441013593".to_owned()),
        description: None,
        cover_url: None,
        added_by: None,
        borrowed_by: None,
        borrowed_at: None,
        created_at: "2026-08-01T00:00:00Z".to_owned(),
        rating_avg: Some(4.5),
        rating_count: 2,
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], Uuid::nil().to_string());
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["borrowed_by"], serde_json::Value::Null);
    assert_eq!(json["rating_count"], 2);
}

#[test]
fn book_draft_accepts_minimal_payload() {
    let draft: BookDraft = serde_json::from_str(r#"{"title":"Dune","author":"Frank Herbert"}"#).unwrap();
    assert!(draft.isbn.is_none());
    assert!(draft.description.is_none());
    assert!(draft.cover_url.is_none());
}
