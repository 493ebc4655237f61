use super::*;

#[test]
fn book_errors_map_to_expected_statuses() {
    assert_eq!(book_error_status(&BookError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(book_error_status(&BookError::AlreadyBorrowed), StatusCode::CONFLICT);
    assert_eq!(book_error_status(&BookError::NotBorrowed), StatusCode::CONFLICT);
    assert_eq!(book_error_status(&BookError::NotBorrower), StatusCode::FORBIDDEN);
    assert_eq!(book_error_status(&BookError::Forbidden), StatusCode::FORBIDDEN);
    assert_eq!(book_error_status(&BookError::InvalidRating(9)), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn isbn_errors_map_to_expected_statuses() {
    assert_eq!(
        isbn_error_status(&isbn::IsbnError::InvalidIsbn("x".to_owned())),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        isbn_error_status(&isbn::IsbnError::NotFound("9780441013593".to_owned())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        isbn_error_status(&isbn::IsbnError::Request("timeout".to_owned())),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        isbn_error_status(&isbn::IsbnError::Parse("bad json".to_owned())),
        StatusCode::BAD_GATEWAY
    );
}

#[test]
fn comment_body_parses() {
    let body: CommentBody = serde_json::from_str(r#"{"body":"great read"}"#).unwrap();
    assert_eq!(body.body, "great read");
}

#[test]
fn rating_body_parses_integer_stars() {
    let body: RatingBody = serde_json::from_str(r#"{"stars":4}"#).unwrap();
    assert_eq!(body.stars, 4);
}

#[test]
fn isbn_preview_serializes_optional_description() {
    let preview = IsbnPreviewResponse {
        isbn: "9780441013593".to_owned(),
        title: "Dune".to_owned(),
        author: "Frank Herbert".to_owned(),
        cover_url: None,
        description: Some("A desert epic.".to_owned()),
    };
    let json = serde_json::to_value(&preview).unwrap();
    assert_eq!(json["isbn"], "9780441013593");
    assert_eq!(json["cover_url"], serde_json::Value::Null);
    assert_eq!(json["description"], "A desert epic.");
}
