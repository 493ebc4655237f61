//! Admin-membership service.
//!
//! DESIGN
//! ======
//! Admin capability is existence in the `admins` set, not a profile field.
//! Because browser listeners watch the `profiles` stream for role changes,
//! every membership mutation also touches the member's profile row to
//! broadcast the edit.

use sqlx::PgPool;
use uuid::Uuid;

use crate::services::changes::ChangeHub;
use crate::services::profile;

/// Whether `user_id` is in the admin set.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn is_admin(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admins WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Whether the admin set is empty (used to seed the first admin).
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn admin_set_is_empty(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT NOT EXISTS (SELECT 1 FROM admins)")
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Add `user_id` to the admin set; a no-op if already a member.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn grant(
    pool: &PgPool,
    hub: &ChangeHub,
    user_id: Uuid,
    granted_by: Option<Uuid>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"INSERT INTO admins (user_id, granted_by)
          VALUES ($1, $2)
          ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(granted_by)
    .execute(pool)
    .await?;

    profile::touch_profile(pool, hub, user_id).await
}

/// Remove `user_id` from the admin set.
///
/// Self-revocation is allowed; the set may become empty.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn revoke(pool: &PgPool, hub: &ChangeHub, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM admins WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    profile::touch_profile(pool, hub, user_id).await
}
