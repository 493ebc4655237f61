//! Book catalog service — CRUD, lending, comments, ratings, reactions.
//!
//! DESIGN
//! ======
//! Every mutation publishes a `books` change event carrying the fresh row
//! aggregate, so catalog lists and detail views refetch instead of
//! patching state locally. Lending uses a conditional update so two
//! simultaneous borrowers cannot both win; the loser sees a conflict.

#[cfg(test)]
#[path = "book_test.rs"]
mod tests;

use changefeed::Op;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::changes::{BOOKS_TABLE, ChangeHub};
use crate::services::session::format_rfc3339;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error("book not found: {0}")]
    NotFound(Uuid),
    #[error("book already borrowed")]
    AlreadyBorrowed,
    #[error("book is not borrowed")]
    NotBorrowed,
    #[error("only the borrower or an admin may return a book")]
    NotBorrower,
    #[error("only the adder or an admin may remove a book")]
    Forbidden,
    #[error("stars out of range: {0}")]
    InvalidRating(i32),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One catalog row with rating aggregates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub added_by: Option<Uuid>,
    pub borrowed_by: Option<Uuid>,
    pub borrowed_at: Option<String>,
    pub created_at: String,
    pub rating_avg: Option<f64>,
    pub rating_count: i64,
}

/// Fields accepted when adding a book.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// One comment with its author's display name resolved.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CommentRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub body: String,
    pub created_at: String,
}

/// Aggregated reactions for one emoji on a book.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReactionRecord {
    pub emoji: String,
    pub count: i64,
    pub reacted: bool,
}

/// Full detail payload for one book.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookDetailRecord {
    pub book: BookRecord,
    pub comments: Vec<CommentRecord>,
    pub reactions: Vec<ReactionRecord>,
    pub my_stars: Option<i32>,
}

// =============================================================================
// PERMISSION / VALIDATION HELPERS
// =============================================================================

pub(crate) fn may_delete(added_by: Option<Uuid>, user_id: Uuid, is_admin: bool) -> bool {
    is_admin || added_by == Some(user_id)
}

pub(crate) fn may_return(borrowed_by: Uuid, user_id: Uuid, is_admin: bool) -> bool {
    is_admin || borrowed_by == user_id
}

pub(crate) fn validate_stars(stars: i32) -> Result<(), BookError> {
    if (1..=5).contains(&stars) {
        Ok(())
    } else {
        Err(BookError::InvalidRating(stars))
    }
}

// =============================================================================
// QUERIES
// =============================================================================

const BOOK_SELECT: &str = r"SELECT b.id, b.title, b.author, b.isbn, b.description, b.cover_url,
           b.added_by, b.borrowed_by, b.borrowed_at, b.created_at,
           AVG(r.stars)::float8 AS rating_avg,
           COUNT(r.stars) AS rating_count
    FROM books b
    LEFT JOIN book_ratings r ON r.book_id = b.id";

fn record_from_row(row: &sqlx::postgres::PgRow) -> BookRecord {
    let borrowed_at: Option<OffsetDateTime> = row.get("borrowed_at");
    let created_at: OffsetDateTime = row.get("created_at");
    BookRecord {
        id: row.get("id"),
        title: row.get("title"),
        author: row.get("author"),
        isbn: row.get("isbn"),
        description: row.get("description"),
        cover_url: row.get("cover_url"),
        added_by: row.get("added_by"),
        borrowed_by: row.get("borrowed_by"),
        borrowed_at: borrowed_at.map(format_rfc3339),
        created_at: format_rfc3339(created_at),
        rating_avg: row.get("rating_avg"),
        rating_count: row.get("rating_count"),
    }
}

/// List the whole catalog, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_books(pool: &PgPool) -> Result<Vec<BookRecord>, BookError> {
    let sql = format!("{BOOK_SELECT} GROUP BY b.id ORDER BY b.created_at DESC");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    Ok(rows.iter().map(record_from_row).collect())
}

/// Fetch one catalog row with aggregates.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn fetch_book(pool: &PgPool, book_id: Uuid) -> Result<Option<BookRecord>, BookError> {
    let sql = format!("{BOOK_SELECT} WHERE b.id = $1 GROUP BY b.id");
    let row = sqlx::query(&sql).bind(book_id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(record_from_row))
}

async fn publish_book(pool: &PgPool, hub: &ChangeHub, book_id: Uuid, op: Op) -> Result<(), BookError> {
    if let Some(record) = fetch_book(pool, book_id).await? {
        let row = serde_json::to_value(&record).unwrap_or_default();
        hub.publish(BOOKS_TABLE, op, Some(book_id), row);
    }
    Ok(())
}

// =============================================================================
// CRUD
// =============================================================================

/// Add a book to the shared catalog.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_book(
    pool: &PgPool,
    hub: &ChangeHub,
    added_by: Uuid,
    draft: &BookDraft,
) -> Result<BookRecord, BookError> {
    let row = sqlx::query(
        r"INSERT INTO books (title, author, isbn, description, cover_url, added_by)
          VALUES ($1, $2, $3, $4, $5, $6)
          RETURNING id",
    )
    .bind(draft.title.trim())
    .bind(draft.author.trim())
    .bind(&draft.isbn)
    .bind(&draft.description)
    .bind(&draft.cover_url)
    .bind(added_by)
    .fetch_one(pool)
    .await?;
    let book_id: Uuid = row.get("id");

    let record = fetch_book(pool, book_id)
        .await?
        .ok_or(BookError::NotFound(book_id))?;
    hub.publish(
        BOOKS_TABLE,
        Op::Insert,
        Some(book_id),
        serde_json::to_value(&record).unwrap_or_default(),
    );
    Ok(record)
}

/// Remove a book; allowed for the adder or an admin.
///
/// # Errors
///
/// Returns [`BookError::NotFound`] or [`BookError::Forbidden`], and
/// database errors otherwise.
pub async fn delete_book(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    is_admin: bool,
    book_id: Uuid,
) -> Result<(), BookError> {
    let row = sqlx::query("SELECT added_by FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_optional(pool)
        .await?
        .ok_or(BookError::NotFound(book_id))?;
    let added_by: Option<Uuid> = row.get("added_by");

    if !may_delete(added_by, user_id, is_admin) {
        return Err(BookError::Forbidden);
    }

    sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(book_id)
        .execute(pool)
        .await?;

    hub.publish(
        BOOKS_TABLE,
        Op::Delete,
        Some(book_id),
        serde_json::json!({ "id": book_id.to_string() }),
    );
    Ok(())
}

// =============================================================================
// LENDING
// =============================================================================

/// Borrow a book. The conditional update guarantees a single borrower.
///
/// # Errors
///
/// Returns [`BookError::AlreadyBorrowed`] when someone else holds it,
/// [`BookError::NotFound`] for unknown ids, and database errors otherwise.
pub async fn lend_book(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    book_id: Uuid,
) -> Result<BookRecord, BookError> {
    let updated = sqlx::query(
        r"UPDATE books
          SET borrowed_by = $2, borrowed_at = now(), updated_at = now()
          WHERE id = $1 AND borrowed_by IS NULL
          RETURNING id",
    )
    .bind(book_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if updated.is_none() {
        return match fetch_book(pool, book_id).await? {
            None => Err(BookError::NotFound(book_id)),
            Some(_) => Err(BookError::AlreadyBorrowed),
        };
    }

    let record = fetch_book(pool, book_id)
        .await?
        .ok_or(BookError::NotFound(book_id))?;
    hub.publish(
        BOOKS_TABLE,
        Op::Update,
        Some(book_id),
        serde_json::to_value(&record).unwrap_or_default(),
    );
    Ok(record)
}

/// Return a borrowed book; allowed for the borrower or an admin.
///
/// # Errors
///
/// Returns [`BookError::NotBorrowed`]/[`BookError::NotBorrower`] for
/// invalid returns, [`BookError::NotFound`] for unknown ids, and database
/// errors otherwise.
pub async fn return_book(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    is_admin: bool,
    book_id: Uuid,
) -> Result<BookRecord, BookError> {
    let row = sqlx::query("SELECT borrowed_by FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_optional(pool)
        .await?
        .ok_or(BookError::NotFound(book_id))?;
    let borrowed_by: Option<Uuid> = row.get("borrowed_by");

    let Some(borrower) = borrowed_by else {
        return Err(BookError::NotBorrowed);
    };
    if !may_return(borrower, user_id, is_admin) {
        return Err(BookError::NotBorrower);
    }

    sqlx::query(
        "UPDATE books SET borrowed_by = NULL, borrowed_at = NULL, updated_at = now() WHERE id = $1",
    )
    .bind(book_id)
    .execute(pool)
    .await?;

    let record = fetch_book(pool, book_id)
        .await?
        .ok_or(BookError::NotFound(book_id))?;
    hub.publish(
        BOOKS_TABLE,
        Op::Update,
        Some(book_id),
        serde_json::to_value(&record).unwrap_or_default(),
    );
    Ok(record)
}

// =============================================================================
// COMMENTS / RATINGS / REACTIONS
// =============================================================================

/// List a book's comments oldest-first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_comments(pool: &PgPool, book_id: Uuid) -> Result<Vec<CommentRecord>, BookError> {
    let rows = sqlx::query(
        r"SELECT c.id, c.book_id, c.user_id, c.body, c.created_at,
                 COALESCE(p.display_name, u.email) AS author_name
          FROM book_comments c
          JOIN users u ON u.id = c.user_id
          LEFT JOIN profiles p ON p.user_id = c.user_id
          WHERE c.book_id = $1
          ORDER BY c.created_at",
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let created_at: OffsetDateTime = r.get("created_at");
            CommentRecord {
                id: r.get("id"),
                book_id: r.get("book_id"),
                user_id: r.get("user_id"),
                author_name: r.get("author_name"),
                body: r.get("body"),
                created_at: format_rfc3339(created_at),
            }
        })
        .collect())
}

/// Post a comment and nudge the book's change stream.
///
/// # Errors
///
/// Returns [`BookError::NotFound`] for unknown books and database errors
/// otherwise.
pub async fn add_comment(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    book_id: Uuid,
    body: &str,
) -> Result<CommentRecord, BookError> {
    if fetch_book(pool, book_id).await?.is_none() {
        return Err(BookError::NotFound(book_id));
    }

    let row = sqlx::query(
        r"INSERT INTO book_comments (book_id, user_id, body)
          VALUES ($1, $2, $3)
          RETURNING id, created_at",
    )
    .bind(book_id)
    .bind(user_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    let author_name: String = sqlx::query(
        r"SELECT COALESCE(p.display_name, u.email) AS author_name
          FROM users u
          LEFT JOIN profiles p ON p.user_id = u.id
          WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?
    .get("author_name");

    let created_at: OffsetDateTime = row.get("created_at");
    let record = CommentRecord {
        id: row.get("id"),
        book_id,
        user_id,
        author_name,
        body: body.to_owned(),
        created_at: format_rfc3339(created_at),
    };

    publish_book(pool, hub, book_id, Op::Update).await?;
    Ok(record)
}

/// Upsert the caller's star rating for a book.
///
/// # Errors
///
/// Returns [`BookError::InvalidRating`] for out-of-range stars,
/// [`BookError::NotFound`] for unknown books, and database errors
/// otherwise.
pub async fn set_rating(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    book_id: Uuid,
    stars: i32,
) -> Result<(), BookError> {
    validate_stars(stars)?;
    if fetch_book(pool, book_id).await?.is_none() {
        return Err(BookError::NotFound(book_id));
    }

    sqlx::query(
        r"INSERT INTO book_ratings (book_id, user_id, stars)
          VALUES ($1, $2, $3)
          ON CONFLICT (book_id, user_id) DO UPDATE SET stars = EXCLUDED.stars",
    )
    .bind(book_id)
    .bind(user_id)
    .bind(stars)
    .execute(pool)
    .await?;

    publish_book(pool, hub, book_id, Op::Update).await
}

/// Toggle the caller's emoji reaction on a book.
///
/// # Errors
///
/// Returns [`BookError::NotFound`] for unknown books and database errors
/// otherwise.
pub async fn toggle_reaction(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    book_id: Uuid,
    emoji: &str,
) -> Result<(), BookError> {
    if fetch_book(pool, book_id).await?.is_none() {
        return Err(BookError::NotFound(book_id));
    }

    let deleted = sqlx::query(
        "DELETE FROM book_reactions WHERE book_id = $1 AND user_id = $2 AND emoji = $3 RETURNING emoji",
    )
    .bind(book_id)
    .bind(user_id)
    .bind(emoji)
    .fetch_optional(pool)
    .await?;

    if deleted.is_none() {
        sqlx::query("INSERT INTO book_reactions (book_id, user_id, emoji) VALUES ($1, $2, $3)")
            .bind(book_id)
            .bind(user_id)
            .bind(emoji)
            .execute(pool)
            .await?;
    }

    publish_book(pool, hub, book_id, Op::Update).await
}

/// Assemble the full detail payload for one book, from the viewer's
/// perspective.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn get_detail(
    pool: &PgPool,
    viewer: Uuid,
    book_id: Uuid,
) -> Result<Option<BookDetailRecord>, BookError> {
    let Some(book) = fetch_book(pool, book_id).await? else {
        return Ok(None);
    };

    let comments = list_comments(pool, book_id).await?;

    let reactions = sqlx::query(
        r"SELECT emoji, COUNT(*) AS count, BOOL_OR(user_id = $2) AS reacted
          FROM book_reactions
          WHERE book_id = $1
          GROUP BY emoji
          ORDER BY emoji",
    )
    .bind(book_id)
    .bind(viewer)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|r| ReactionRecord { emoji: r.get("emoji"), count: r.get("count"), reacted: r.get("reacted") })
    .collect();

    let my_stars: Option<i32> =
        sqlx::query_scalar("SELECT stars FROM book_ratings WHERE book_id = $1 AND user_id = $2")
            .bind(book_id)
            .bind(viewer)
            .fetch_optional(pool)
            .await?;

    Ok(Some(BookDetailRecord { book, comments, reactions, my_stars }))
}
