//! Shared wire-protocol DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types intentionally mirror server response payloads so serde
//! round-trips stay lossless and the session core can remain schema-driven.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// An authenticated user as carried inside a [`Session`].
///
/// Owned by the auth backend; the client treats it as immutable reference
/// data (display attributes live on the profile instead).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Sign-in email address.
    pub email: String,
}

/// The active credential bundle as returned by `/api/auth/session`.
///
/// The raw token never reaches script code (HttpOnly cookie); this is the
/// visible projection of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User the credential was issued to.
    pub user: User,
    /// ISO 8601 expiry of the server-side session row, if exposed.
    pub expires_at: Option<String>,
}

/// One row of the `profiles` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    /// Owning user identifier (UUID string).
    pub user_id: String,
    /// Display name, editable by the user.
    pub display_name: Option<String>,
    /// Avatar image URL, if set.
    pub avatar_url: Option<String>,
    /// Approval flag gating the authenticated catalog.
    pub is_approved: bool,
}

/// Admin-membership check response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMembership {
    pub is_admin: bool,
}

/// A catalog entry as returned by the books endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique book identifier (UUID string).
    pub id: String,
    pub title: String,
    pub author: String,
    /// ISBN-10/13 when the book was added via lookup.
    pub isbn: Option<String>,
    /// Free-form or AI-drafted description.
    pub description: Option<String>,
    pub cover_url: Option<String>,
    /// User who added the book (UUID string), if known.
    pub added_by: Option<String>,
    /// Current borrower (UUID string); `None` means available.
    pub borrowed_by: Option<String>,
    /// ISO 8601 timestamp of the current loan, if any.
    pub borrowed_at: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// Mean star rating across users, absent when unrated.
    pub rating_avg: Option<f64>,
    /// Number of ratings aggregated into `rating_avg`.
    #[serde(default)]
    pub rating_count: i64,
}

/// A comment on a book's detail page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookComment {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    /// Display name of the comment author at render time.
    pub author_name: String,
    /// Markdown source; rendered client-side.
    pub body: String,
    pub created_at: String,
}

/// Aggregated reaction counts for one emoji on a book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: i64,
    /// Whether the current user contributed one of the reactions.
    pub reacted: bool,
}

/// Full detail payload for one book.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookDetail {
    pub book: Book,
    pub comments: Vec<BookComment>,
    pub reactions: Vec<ReactionCount>,
    /// Current user's star rating, if they rated this book.
    pub my_stars: Option<i64>,
}

/// Metadata preview returned by the ISBN intake endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsbnPreview {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    /// AI-drafted description, absent when no LLM is configured.
    pub description: Option<String>,
}

/// Fields submitted when adding or editing a catalog entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

/// One row of the admin user directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub is_approved: bool,
    pub is_admin: bool,
}
