//! Catalog routes — books CRUD, lending, comments, ratings, reactions,
//! and ISBN intake with optional AI-drafted descriptions.

#[cfg(test)]
#[path = "books_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use uuid::Uuid;

use super::auth::ApprovedUser;
use crate::services::book::{self, BookDraft, BookError};
use crate::services::{admin, ai, isbn};
use crate::state::AppState;

pub(crate) fn book_error_status(err: &BookError) -> StatusCode {
    match err {
        BookError::NotFound(_) => StatusCode::NOT_FOUND,
        BookError::AlreadyBorrowed | BookError::NotBorrowed => StatusCode::CONFLICT,
        BookError::NotBorrower | BookError::Forbidden => StatusCode::FORBIDDEN,
        BookError::InvalidRating(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn isbn_error_status(err: &isbn::IsbnError) -> StatusCode {
    match err {
        isbn::IsbnError::InvalidIsbn(_) => StatusCode::UNPROCESSABLE_ENTITY,
        isbn::IsbnError::NotFound(_) => StatusCode::NOT_FOUND,
        isbn::IsbnError::Request(_) | isbn::IsbnError::Parse(_) => StatusCode::BAD_GATEWAY,
    }
}

fn book_failure(context: &str, err: &BookError) -> Response {
    if matches!(err, BookError::Database(_)) {
        tracing::error!(error = %err, context, "book operation failed");
    }
    book_error_status(err).into_response()
}

// =============================================================================
// CATALOG
// =============================================================================

/// `GET /api/books` — the whole catalog, newest first.
pub async fn list_books(State(state): State<AppState>, _user: ApprovedUser) -> Response {
    match book::list_books(&state.pool).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => book_failure("list", &e),
    }
}

/// `POST /api/books` — add a catalog entry.
pub async fn create_book(
    State(state): State<AppState>,
    user: ApprovedUser,
    Json(draft): Json<BookDraft>,
) -> Response {
    if draft.title.trim().is_empty() || draft.author.trim().is_empty() {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    }

    match book::create_book(&state.pool, &state.changes, user.user.id, &draft).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => book_failure("create", &e),
    }
}

/// `GET /api/books/{id}` — detail payload from the viewer's perspective.
pub async fn book_detail(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(book_id): Path<Uuid>,
) -> Response {
    match book::get_detail(&state.pool, user.user.id, book_id).await {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => book_failure("detail", &e),
    }
}

/// `DELETE /api/books/{id}` — remove an entry (adder or admin).
pub async fn delete_book(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(book_id): Path<Uuid>,
) -> Response {
    let is_admin = admin::is_admin(&state.pool, user.user.id).await.unwrap_or(false);
    match book::delete_book(&state.pool, &state.changes, user.user.id, is_admin, book_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => book_failure("delete", &e),
    }
}

// =============================================================================
// LENDING
// =============================================================================

/// `POST /api/books/{id}/lend` — borrow a book.
pub async fn lend_book(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(book_id): Path<Uuid>,
) -> Response {
    match book::lend_book(&state.pool, &state.changes, user.user.id, book_id).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => book_failure("lend", &e),
    }
}

/// `POST /api/books/{id}/return` — return a borrowed book (borrower or
/// admin).
pub async fn return_book(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(book_id): Path<Uuid>,
) -> Response {
    let is_admin = admin::is_admin(&state.pool, user.user.id).await.unwrap_or(false);
    match book::return_book(&state.pool, &state.changes, user.user.id, is_admin, book_id).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => book_failure("return", &e),
    }
}

// =============================================================================
// COMMENTS / RATINGS / REACTIONS
// =============================================================================

#[derive(Deserialize)]
pub struct CommentBody {
    body: String,
}

/// `POST /api/books/{id}/comments` — post a comment.
pub async fn post_comment(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(book_id): Path<Uuid>,
    Json(body): Json<CommentBody>,
) -> Response {
    let text = body.body.trim();
    if text.is_empty() {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    }

    match book::add_comment(&state.pool, &state.changes, user.user.id, book_id, text).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => book_failure("comment", &e),
    }
}

#[derive(Deserialize)]
pub struct RatingBody {
    stars: i32,
}

/// `PUT /api/books/{id}/rating` — upsert the caller's star rating.
pub async fn set_rating(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(book_id): Path<Uuid>,
    Json(body): Json<RatingBody>,
) -> Response {
    match book::set_rating(&state.pool, &state.changes, user.user.id, book_id, body.stars).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => book_failure("rating", &e),
    }
}

#[derive(Deserialize)]
pub struct ReactionBody {
    emoji: String,
}

/// `POST /api/books/{id}/reactions` — toggle an emoji reaction.
pub async fn toggle_reaction(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(book_id): Path<Uuid>,
    Json(body): Json<ReactionBody>,
) -> Response {
    if body.emoji.is_empty() || body.emoji.chars().count() > 8 {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    }

    match book::toggle_reaction(&state.pool, &state.changes, user.user.id, book_id, &body.emoji).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => book_failure("reaction", &e),
    }
}

// =============================================================================
// ISBN INTAKE
// =============================================================================

#[derive(serde::Serialize)]
pub struct IsbnPreviewResponse {
    isbn: String,
    title: String,
    author: String,
    cover_url: Option<String>,
    description: Option<String>,
}

/// `GET /api/isbn/{isbn}` — metadata lookup plus an AI-drafted description
/// when an LLM is configured. Rate limited per user and globally.
pub async fn isbn_preview(
    State(state): State<AppState>,
    user: ApprovedUser,
    Path(raw_isbn): Path<String>,
) -> Response {
    if let Err(e) = state.rate_limiter.check_and_record(user.user.id) {
        tracing::warn!(error = %e, user_id = %user.user.id, "isbn lookup rate limited");
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    let found = match isbn::lookup(&raw_isbn).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, "isbn lookup failed");
            return isbn_error_status(&e).into_response();
        }
    };

    // Drafting is best-effort: the preview ships without a description
    // when the model is absent or fails.
    let description = match &state.llm {
        Some(llm) => match ai::draft_description(llm.as_ref(), &found.title, &found.author).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "description drafting failed");
                None
            }
        },
        None => None,
    };

    Json(IsbnPreviewResponse {
        isbn: found.isbn,
        title: found.title,
        author: found.author,
        cover_url: found.cover_url,
        description,
    })
    .into_response()
}
