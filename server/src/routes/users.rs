//! User routes — profiles, admin membership, and approval management.

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use uuid::Uuid;

use super::auth::{AdminUser, AuthUser};
use crate::services::{admin, profile};
use crate::state::AppState;

/// `GET /api/users/{id}/profile` — single profile row, any signed-in user.
pub async fn get_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Response {
    match profile::fetch_profile(&state.pool, user_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "profile fetch failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

/// `PATCH /api/users/{id}/profile` — self-service edit of display fields.
pub async fn patch_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(patch): Json<ProfilePatch>,
) -> Response {
    if auth.user.id != user_id {
        return StatusCode::FORBIDDEN.into_response();
    }

    match profile::update_profile(&state.pool, &state.changes, user_id, patch.display_name, patch.avatar_url).await
    {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "profile update failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /api/admins/{id}` — admin-set membership check, any signed-in
/// user. Kept separate from the profile read so the two halves of the
/// approval resolution fail independently.
pub async fn admin_membership(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Response {
    match admin::is_admin(&state.pool, user_id).await {
        Ok(is_admin) => Json(serde_json::json!({ "is_admin": is_admin })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "admin membership check failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /api/users` — the full directory with approval/admin flags
/// (admin only).
pub async fn user_directory(State(state): State<AppState>, _admin: AdminUser) -> Response {
    match profile::list_directory(&state.pool).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "directory listing failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct ApprovalBody {
    is_approved: bool,
}

/// `PUT /api/users/{id}/approval` — toggle a user's approval (admin only).
pub async fn set_approval(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ApprovalBody>,
) -> Response {
    match profile::set_approval(&state.pool, &state.changes, user_id, body.is_approved).await {
        Ok(Some(_)) => StatusCode::NO_CONTENT.into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "approval update failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `PUT /api/admins/{id}` — add a user to the admin set (admin only).
pub async fn grant_admin(
    State(state): State<AppState>,
    granting: AdminUser,
    Path(user_id): Path<Uuid>,
) -> Response {
    match admin::grant(&state.pool, &state.changes, user_id, Some(granting.user.id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "admin grant failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `DELETE /api/admins/{id}` — remove a user from the admin set (admin
/// only; self-revocation allowed).
pub async fn revoke_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> Response {
    match admin::revoke(&state.pool, &state.changes, user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "admin revoke failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
