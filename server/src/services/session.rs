//! Session and WS-ticket management.
//!
//! ARCHITECTURE
//! ============
//! HTTP auth uses long-lived session tokens, while websocket upgrades use
//! one-time short-lived tickets to avoid sending cookies over WS query
//! params. Session mutations publish `sessions` change events keyed by
//! the owning user id — never the token — so browser listeners can follow
//! sign-in, refresh, and sign-out transitions without credential exposure.
//!
//! TRADE-OFFS
//! ==========
//! Ticket consumption is destructive (`DELETE ... RETURNING`) to guarantee
//! single use; this favors replay safety over reconnect convenience.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::fmt::Write;

use changefeed::Op;
use rand::Rng;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::services::changes::{ChangeHub, SESSIONS_TABLE};

/// Sessions closer than this to expiry are silently extended on use.
const REFRESH_WINDOW_DAYS: i64 = 7;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Generate a short-lived 16-byte hex WS ticket.
#[must_use]
pub(crate) fn generate_ws_ticket() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// User identity attached to a validated session.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Sign-in email address.
    pub email: String,
}

/// A validated session with its server-side expiry.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user: SessionUser,
    pub expires_at: OffsetDateTime,
}

pub(crate) fn format_rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}

/// Whether a session expiring at `expires_at` should be extended now.
pub(crate) fn needs_refresh(expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    expires_at - now < time::Duration::days(REFRESH_WINDOW_DAYS)
}

fn session_event_row(user_id: Uuid, email: &str, expires_at: OffsetDateTime) -> serde_json::Value {
    serde_json::json!({
        "user_id": user_id.to_string(),
        "email": email,
        "expires_at": format_rfc3339(expires_at),
    })
}

/// Create a session for the given user, returning the token.
///
/// Publishes a `sessions` insert event for the owning user.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_session(pool: &PgPool, hub: &ChangeHub, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let row = sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2) RETURNING expires_at")
        .bind(&token)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    let expires_at: OffsetDateTime = row.get("expires_at");

    let email: String = sqlx::query("SELECT email FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?
        .get("email");

    hub.publish(SESSIONS_TABLE, Op::Insert, Some(user_id), session_event_row(user_id, &email, expires_at));
    Ok(token)
}

/// Validate a session token and return the associated user and expiry.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionRecord>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.email, s.expires_at
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionRecord {
        user: SessionUser { id: r.get("id"), email: r.get("email") },
        expires_at: r.get("expires_at"),
    }))
}

/// Extend a session nearing expiry and publish the refresh as a `sessions`
/// update event. Returns the record with the (possibly extended) expiry.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn refresh_session_if_stale(
    pool: &PgPool,
    hub: &ChangeHub,
    token: &str,
) -> Result<Option<SessionRecord>, sqlx::Error> {
    let Some(record) = validate_session(pool, token).await? else {
        return Ok(None);
    };

    if !needs_refresh(record.expires_at, OffsetDateTime::now_utc()) {
        return Ok(Some(record));
    }

    let row = sqlx::query(
        "UPDATE sessions SET expires_at = now() + INTERVAL '30 days' WHERE token = $1 RETURNING expires_at",
    )
    .bind(token)
    .fetch_one(pool)
    .await?;
    let expires_at: OffsetDateTime = row.get("expires_at");

    hub.publish(
        SESSIONS_TABLE,
        Op::Update,
        Some(record.user.id),
        session_event_row(record.user.id, &record.user.email, expires_at),
    );

    Ok(Some(SessionRecord { user: record.user, expires_at }))
}

/// Delete a session by token, publishing a `sessions` delete event when a
/// row was actually removed.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn delete_session(pool: &PgPool, hub: &ChangeHub, token: &str) -> Result<(), sqlx::Error> {
    let row = sqlx::query("DELETE FROM sessions WHERE token = $1 RETURNING user_id")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    if let Some(row) = row {
        let user_id: Uuid = row.get("user_id");
        let email: Option<String> = sqlx::query("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .map(|r| r.get("email"));

        hub.publish(
            SESSIONS_TABLE,
            Op::Delete,
            Some(user_id),
            serde_json::json!({
                "user_id": user_id.to_string(),
                "email": email,
            }),
        );
    }
    Ok(())
}

/// Create a short-lived WS ticket for the given user.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_ws_ticket(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let ticket = generate_ws_ticket();
    sqlx::query("INSERT INTO ws_tickets (ticket, user_id) VALUES ($1, $2)")
        .bind(&ticket)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(ticket)
}

/// Consume a WS ticket atomically, returning the `user_id` if valid.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn consume_ws_ticket(pool: &PgPool, ticket: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query("DELETE FROM ws_tickets WHERE ticket = $1 AND expires_at > now() RETURNING user_id")
        .bind(ticket)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("user_id")))
}
