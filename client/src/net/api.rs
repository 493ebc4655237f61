//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! The session endpoints return the typed errors the session core's
//! propagation policy is written against (`AuthError`,
//! `ApprovalLookupError`); catalog endpoints return `Result<_, String>`
//! so page code can degrade to notices without crashing hydration.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{
    Book, BookComment, BookDetail, BookDraft, DirectoryUser, IsbnPreview, ProfileRow, Session,
};
#[cfg(feature = "hydrate")]
use super::types::AdminMembership;
use crate::session::error::{ApprovalLookupError, AuthError};

#[cfg(any(test, feature = "hydrate"))]
fn profile_endpoint(user_id: &str) -> String {
    format!("/api/users/{user_id}/profile")
}

#[cfg(any(test, feature = "hydrate"))]
fn admin_endpoint(user_id: &str) -> String {
    format!("/api/admins/{user_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn book_endpoint(book_id: &str) -> String {
    format!("/api/books/{book_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn isbn_endpoint(isbn: &str) -> String {
    format!("/api/isbn/{isbn}")
}

#[cfg(any(test, feature = "hydrate"))]
fn ticket_request_failed_message(status: u16) -> String {
    format!("ticket request failed: {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn request_code_failed_message(status: u16) -> String {
    format!("request code failed: {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn verify_code_failed_message(status: u16) -> String {
    format!("verify code failed: {status}")
}

// =============================================================================
// SESSION / APPROVAL
// =============================================================================

/// Fetch the active session from `GET /api/auth/session`.
///
/// Returns `Ok(None)` when no valid credential exists (401) and on the
/// server, where the cookie is not visible to this code path.
///
/// # Errors
///
/// Returns [`AuthError`] on transport failures, unexpected statuses, or a
/// malformed payload.
pub async fn fetch_current_session() -> Result<Option<Session>, AuthError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/session")
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        match resp.status() {
            200 => {
                let session = resp
                    .json::<Session>()
                    .await
                    .map_err(|e| AuthError::Malformed(e.to_string()))?;
                Ok(Some(session))
            }
            401 => Ok(None),
            status => Err(AuthError::Status(status)),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Ok(None)
    }
}

/// Invalidate the current credential via `POST /api/auth/logout`.
///
/// # Errors
///
/// Returns [`AuthError`] when the backend rejects the call; the caller must
/// then leave local auth state untouched.
pub async fn sign_out() -> Result<(), AuthError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/logout")
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        if resp.ok() || resp.status() == 204 {
            Ok(())
        } else {
            Err(AuthError::Status(resp.status()))
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(AuthError::Transport("not available on server".to_owned()))
    }
}

/// Fetch a user's profile row from `GET /api/users/{id}/profile`.
///
/// Returns `Ok(None)` when the profile does not exist (404).
///
/// # Errors
///
/// Returns [`ApprovalLookupError`] on transport failures, unexpected
/// statuses, or a malformed payload.
pub async fn fetch_profile(user_id: &str) -> Result<Option<ProfileRow>, ApprovalLookupError> {
    #[cfg(feature = "hydrate")]
    {
        let url = profile_endpoint(user_id);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| ApprovalLookupError::Transport(e.to_string()))?;
        match resp.status() {
            200 => {
                let row = resp
                    .json::<ProfileRow>()
                    .await
                    .map_err(|e| ApprovalLookupError::Malformed(e.to_string()))?;
                Ok(Some(row))
            }
            404 => Ok(None),
            status => Err(ApprovalLookupError::Status(status)),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user_id;
        Ok(None)
    }
}

/// Check admin-set membership via `GET /api/admins/{id}`.
///
/// # Errors
///
/// Returns [`ApprovalLookupError`] on transport failures, unexpected
/// statuses, or a malformed payload.
pub async fn fetch_admin_membership(user_id: &str) -> Result<bool, ApprovalLookupError> {
    #[cfg(feature = "hydrate")]
    {
        let url = admin_endpoint(user_id);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| ApprovalLookupError::Transport(e.to_string()))?;
        if !resp.ok() {
            return Err(ApprovalLookupError::Status(resp.status()));
        }
        let membership = resp
            .json::<AdminMembership>()
            .await
            .map_err(|e| ApprovalLookupError::Malformed(e.to_string()))?;
        Ok(membership.is_admin)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user_id;
        Ok(false)
    }
}

/// Create a WebSocket authentication ticket via `POST /api/auth/ws-ticket`.
///
/// # Errors
///
/// Returns an error string if the ticket request fails.
pub async fn create_ws_ticket() -> Result<String, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/ws-ticket")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(ticket_request_failed_message(resp.status()));
        }
        #[derive(serde::Deserialize)]
        struct TicketResponse {
            ticket: String,
        }
        let body: TicketResponse = resp.json().await.map_err(|e| e.to_string())?;
        Ok(body.ticket)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

// =============================================================================
// EMAIL ACCESS-CODE SIGN-IN
// =============================================================================

#[cfg(feature = "hydrate")]
#[derive(Debug, serde::Deserialize)]
struct RequestEmailCodeResponse {
    ok: bool,
    code: Option<String>,
}

/// Request a 6-character email login code via `POST /api/auth/email/request-code`.
///
/// Returns an optional code string when the server is configured to echo codes.
///
/// # Errors
///
/// Returns an error string if the HTTP request fails or the server responds
/// with a non-OK status.
pub async fn request_email_login_code(email: &str) -> Result<Option<String>, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email });
        let resp = gloo_net::http::Request::post("/api/auth/email/request-code")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(request_code_failed_message(resp.status()));
        }
        let body: RequestEmailCodeResponse = resp.json().await.map_err(|e| e.to_string())?;
        if !body.ok {
            return Err("request code failed".to_owned());
        }
        Ok(body.code)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = email;
        Err("not available on server".to_owned())
    }
}

#[cfg(feature = "hydrate")]
#[derive(Debug, serde::Deserialize)]
struct VerifyEmailCodeResponse {
    ok: bool,
}

/// Verify an email login code via `POST /api/auth/email/verify-code`.
///
/// # Errors
///
/// Returns an error string if the HTTP request fails, the server responds
/// with a non-OK status, or the verification code is rejected.
pub async fn verify_email_login_code(email: &str, code: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email, "code": code });
        let resp = gloo_net::http::Request::post("/api/auth/email/verify-code")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(verify_code_failed_message(resp.status()));
        }
        let body: VerifyEmailCodeResponse = resp.json().await.map_err(|e| e.to_string())?;
        if !body.ok {
            return Err("verify code failed".to_owned());
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, code);
        Err("not available on server".to_owned())
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Fetch the shared catalog from `GET /api/books`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn fetch_books() -> Result<Vec<Book>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/books")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("book list failed: {}", resp.status()));
        }
        resp.json::<Vec<Book>>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Ok(Vec::new())
    }
}

/// Add a book to the catalog via `POST /api/books`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn create_book(draft: &BookDraft) -> Result<Book, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/books")
            .json(draft)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("create book failed: {}", resp.status()));
        }
        resp.json::<Book>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = draft;
        Err("not available on server".to_owned())
    }
}

/// Fetch one book's detail payload from `GET /api/books/{id}`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn fetch_book_detail(book_id: &str) -> Result<BookDetail, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = book_endpoint(book_id);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("book detail failed: {}", resp.status()));
        }
        resp.json::<BookDetail>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = book_id;
        Err("not available on server".to_owned())
    }
}

/// Remove a book via `DELETE /api/books/{id}` (adder or admin only).
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn delete_book(book_id: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let url = book_endpoint(book_id);
        let resp = gloo_net::http::Request::delete(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() && resp.status() != 204 {
            return Err(format!("delete book failed: {}", resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = book_id;
        Err("not available on server".to_owned())
    }
}

/// Borrow a book via `POST /api/books/{id}/lend`.
///
/// # Errors
///
/// Returns an error string if the request fails; a 409 means someone else
/// borrowed it first.
pub async fn lend_book(book_id: &str) -> Result<Book, String> {
    book_action(book_id, "lend").await
}

/// Return a borrowed book via `POST /api/books/{id}/return`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn return_book(book_id: &str) -> Result<Book, String> {
    book_action(book_id, "return").await
}

async fn book_action(book_id: &str, action: &str) -> Result<Book, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("{}/{action}", book_endpoint(book_id));
        let resp = gloo_net::http::Request::post(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if resp.status() == 409 {
            return Err("already borrowed".to_owned());
        }
        if !resp.ok() {
            return Err(format!("{action} failed: {}", resp.status()));
        }
        resp.json::<Book>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (book_id, action);
        Err("not available on server".to_owned())
    }
}

/// Post a comment via `POST /api/books/{id}/comments`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn post_comment(book_id: &str, body: &str) -> Result<BookComment, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("{}/comments", book_endpoint(book_id));
        let payload = serde_json::json!({ "body": body });
        let resp = gloo_net::http::Request::post(&url)
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("comment failed: {}", resp.status()));
        }
        resp.json::<BookComment>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (book_id, body);
        Err("not available on server".to_owned())
    }
}

/// Set the current user's star rating via `PUT /api/books/{id}/rating`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn set_rating(book_id: &str, stars: u8) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("{}/rating", book_endpoint(book_id));
        let payload = serde_json::json!({ "stars": stars });
        let resp = gloo_net::http::Request::put(&url)
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() && resp.status() != 204 {
            return Err(format!("rating failed: {}", resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (book_id, stars);
        Err("not available on server".to_owned())
    }
}

/// Toggle an emoji reaction via `POST /api/books/{id}/reactions`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn toggle_reaction(book_id: &str, emoji: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("{}/reactions", book_endpoint(book_id));
        let payload = serde_json::json!({ "emoji": emoji });
        let resp = gloo_net::http::Request::post(&url)
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() && resp.status() != 204 {
            return Err(format!("reaction failed: {}", resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (book_id, emoji);
        Err("not available on server".to_owned())
    }
}

/// Look up book metadata (and an AI-drafted description, when configured)
/// via `GET /api/isbn/{isbn}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the ISBN is unknown.
pub async fn lookup_isbn(isbn: &str) -> Result<IsbnPreview, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = isbn_endpoint(isbn);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if resp.status() == 404 {
            return Err("no book found for that ISBN".to_owned());
        }
        if resp.status() == 429 {
            return Err("lookup rate limit reached, try again shortly".to_owned());
        }
        if !resp.ok() {
            return Err(format!("isbn lookup failed: {}", resp.status()));
        }
        resp.json::<IsbnPreview>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = isbn;
        Err("not available on server".to_owned())
    }
}

// =============================================================================
// ADMINISTRATION
// =============================================================================

/// List all users with approval/admin flags via `GET /api/users` (admin only).
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn fetch_user_directory() -> Result<Vec<DirectoryUser>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/users")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("user directory failed: {}", resp.status()));
        }
        resp.json::<Vec<DirectoryUser>>()
            .await
            .map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Ok(Vec::new())
    }
}

/// Set a user's approval flag via `PUT /api/users/{id}/approval` (admin only).
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn set_user_approval(user_id: &str, approved: bool) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("/api/users/{user_id}/approval");
        let payload = serde_json::json!({ "is_approved": approved });
        let resp = gloo_net::http::Request::put(&url)
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() && resp.status() != 204 {
            return Err(format!("approval update failed: {}", resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (user_id, approved);
        Err("not available on server".to_owned())
    }
}

/// Grant or revoke admin membership via `PUT`/`DELETE /api/admins/{id}`
/// (admin only).
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn set_admin_membership(user_id: &str, is_admin: bool) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let url = admin_endpoint(user_id);
        let builder = if is_admin {
            gloo_net::http::Request::put(&url)
        } else {
            gloo_net::http::Request::delete(&url)
        };
        let resp = builder.send().await.map_err(|e| e.to_string())?;
        if !resp.ok() && resp.status() != 204 {
            return Err(format!("admin update failed: {}", resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (user_id, is_admin);
        Err("not available on server".to_owned())
    }
}
