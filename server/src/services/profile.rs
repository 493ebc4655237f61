//! Profile service — reads and mutations of the per-user profile row.
//!
//! DESIGN
//! ======
//! Profiles are provisioned here on first successful sign-in; the browser
//! client never creates them. Every mutation publishes a `profiles` change
//! event keyed by the owning user id, which is what drives live
//! approval/role propagation in signed-in browsers.

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;

use changefeed::Op;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::changes::{ChangeHub, PROFILES_TABLE};

/// One row of the `profiles` table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_approved: bool,
}

/// One row of the admin user directory.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DirectoryRecord {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub is_approved: bool,
    pub is_admin: bool,
}

pub(crate) fn profile_event_row(record: &ProfileRecord) -> serde_json::Value {
    serde_json::json!({
        "user_id": record.user_id.to_string(),
        "display_name": record.display_name,
        "avatar_url": record.avatar_url,
        "is_approved": record.is_approved,
    })
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> ProfileRecord {
    ProfileRecord {
        user_id: row.get("user_id"),
        display_name: row.get("display_name"),
        avatar_url: row.get("avatar_url"),
        is_approved: row.get("is_approved"),
    }
}

/// Fetch one profile row.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT user_id, display_name, avatar_url, is_approved FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| record_from_row(&r)))
}

/// Provision a profile on first sign-in; a no-op when one already exists.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn ensure_profile(pool: &PgPool, hub: &ChangeHub, user_id: Uuid) -> Result<(), sqlx::Error> {
    let row = sqlx::query(
        r"INSERT INTO profiles (user_id)
          VALUES ($1)
          ON CONFLICT (user_id) DO NOTHING
          RETURNING user_id, display_name, avatar_url, is_approved",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = row {
        let record = record_from_row(&row);
        hub.publish(PROFILES_TABLE, Op::Insert, Some(user_id), profile_event_row(&record));
    }
    Ok(())
}

/// Self-service profile edit (display name / avatar).
///
/// # Errors
///
/// Returns a database error if the update fails.
pub async fn update_profile(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    display_name: Option<String>,
    avatar_url: Option<String>,
) -> Result<Option<ProfileRecord>, sqlx::Error> {
    let row = sqlx::query(
        r"UPDATE profiles
          SET display_name = $2, avatar_url = $3, updated_at = now()
          WHERE user_id = $1
          RETURNING user_id, display_name, avatar_url, is_approved",
    )
    .bind(user_id)
    .bind(display_name)
    .bind(avatar_url)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| {
        let record = record_from_row(&r);
        hub.publish(PROFILES_TABLE, Op::Update, Some(user_id), profile_event_row(&record));
        record
    }))
}

/// Toggle a user's approval flag (admin operation).
///
/// # Errors
///
/// Returns a database error if the update fails.
pub async fn set_approval(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    approved: bool,
) -> Result<Option<ProfileRecord>, sqlx::Error> {
    let row = sqlx::query(
        r"UPDATE profiles
          SET is_approved = $2, updated_at = now()
          WHERE user_id = $1
          RETURNING user_id, display_name, avatar_url, is_approved",
    )
    .bind(user_id)
    .bind(approved)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| {
        let record = record_from_row(&r);
        hub.publish(PROFILES_TABLE, Op::Update, Some(user_id), profile_event_row(&record));
        record
    }))
}

/// Bump a profile's timestamp and broadcast it unchanged.
///
/// Used by admin-membership changes: the role lives in its own table, but
/// browser listeners watch the profile row, so the role edit must surface
/// there.
///
/// # Errors
///
/// Returns a database error if the update fails.
pub async fn touch_profile(pool: &PgPool, hub: &ChangeHub, user_id: Uuid) -> Result<(), sqlx::Error> {
    let row = sqlx::query(
        r"UPDATE profiles
          SET updated_at = now()
          WHERE user_id = $1
          RETURNING user_id, display_name, avatar_url, is_approved",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = row {
        let record = record_from_row(&row);
        hub.publish(PROFILES_TABLE, Op::Update, Some(user_id), profile_event_row(&record));
    }
    Ok(())
}

/// List every user with approval and admin flags (admin directory).
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_directory(pool: &PgPool) -> Result<Vec<DirectoryRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT u.id AS user_id,
                 u.email,
                 p.display_name,
                 COALESCE(p.is_approved, FALSE) AS is_approved,
                 (a.user_id IS NOT NULL) AS is_admin
          FROM users u
          LEFT JOIN profiles p ON p.user_id = u.id
          LEFT JOIN admins a ON a.user_id = u.id
          ORDER BY u.created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| DirectoryRecord {
            user_id: r.get("user_id"),
            email: r.get("email"),
            display_name: r.get("display_name"),
            is_approved: r.get("is_approved"),
            is_admin: r.get("is_admin"),
        })
        .collect())
}
