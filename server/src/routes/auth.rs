//! Auth routes — session endpoint, email access-code flow, WS tickets.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use time::Duration;

use crate::services::{admin, email_auth, profile, session};
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_BASE_URL")
        .map(|uri| uri.starts_with("https://"))
        .unwrap_or(false)
}

/// Whether generated access codes are echoed back in the API response.
/// Defaults to on when no email provider is configured, so local setups
/// stay usable without Resend credentials.
fn echo_codes_enabled() -> bool {
    env_bool("AUTH_ECHO_CODES").unwrap_or_else(|| std::env::var("RESEND_API_KEY").is_err())
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .secure(cookie_secure())
        .build()
}

fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::ZERO)
        .build()
}

pub(crate) fn email_auth_status(err: &email_auth::EmailAuthError) -> StatusCode {
    match err {
        email_auth::EmailAuthError::InvalidEmail | email_auth::EmailAuthError::InvalidCode => {
            StatusCode::BAD_REQUEST
        }
        email_auth::EmailAuthError::VerificationFailed => StatusCode::UNAUTHORIZED,
        email_auth::EmailAuthError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        email_auth::EmailAuthError::EmailDelivery(_) => StatusCode::BAD_GATEWAY,
    }
}

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let record = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user: record.user, token: token.to_owned() })
    }
}

/// Authenticated user whose profile carries the approval flag.
/// Gates every catalog endpoint.
pub struct ApprovedUser {
    pub user: session::SessionUser,
}

impl<S> axum::extract::FromRequestParts<S> for ApprovedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let approved = profile::fetch_profile(&app_state.pool, auth.user.id)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .is_some_and(|p| p.is_approved);
        if !approved {
            return Err(StatusCode::FORBIDDEN);
        }

        Ok(Self { user: auth.user })
    }
}

/// Authenticated member of the admin set.
pub struct AdminUser {
    pub user: session::SessionUser,
}

impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let is_admin = admin::is_admin(&app_state.pool, auth.user.id)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        if !is_admin {
            return Err(StatusCode::FORBIDDEN);
        }

        Ok(Self { user: auth.user })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(serde::Serialize)]
pub struct SessionResponse {
    user: session::SessionUser,
    expires_at: Option<String>,
}

/// `GET /api/auth/session` — return the active session, silently extending
/// it when it nears expiry (the extension is pushed as a `sessions` update
/// event).
pub async fn current_session(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match session::refresh_session_if_stale(&state.pool, &state.changes, token).await {
        Ok(Some(record)) => {
            let expires_at = record
                .expires_at
                .format(&time::format_description::well_known::Rfc3339)
                .ok();
            Json(SessionResponse { user: record.user, expires_at }).into_response()
        }
        Ok(None) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct RequestCodeBody {
    email: String,
}

/// `POST /api/auth/email/request-code` — mint an access code and deliver
/// it by email (or echo it for local setups).
pub async fn request_email_code(
    State(state): State<AppState>,
    Json(body): Json<RequestCodeBody>,
) -> Response {
    let code = match email_auth::request_access_code(&state.pool, &body.email).await {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!(error = %e, "access code request failed");
            return email_auth_status(&e).into_response();
        }
    };

    if let (Ok(api_key), Ok(from)) = (std::env::var("RESEND_API_KEY"), std::env::var("RESEND_FROM")) {
        if let Err(e) = email_auth::send_access_code_email(&api_key, &from, &body.email, &code).await {
            tracing::error!(error = %e, "access code delivery failed");
            return email_auth_status(&e).into_response();
        }
    }

    let echoed = echo_codes_enabled().then_some(code);
    Json(serde_json::json!({ "ok": true, "code": echoed })).into_response()
}

#[derive(Deserialize)]
pub struct VerifyCodeBody {
    email: String,
    code: String,
}

/// `POST /api/auth/email/verify-code` — verify the code, provision the
/// profile on first sign-in, seed the first admin, and set the session
/// cookie.
pub async fn verify_email_code(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyCodeBody>,
) -> Response {
    let user_id = match email_auth::verify_access_code(&state.pool, &body.email, &body.code).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "access code verification failed");
            return email_auth_status(&e).into_response();
        }
    };

    if let Err(e) = profile::ensure_profile(&state.pool, &state.changes, user_id).await {
        tracing::error!(error = %e, "profile provisioning failed");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    // Bootstrap: with an empty admin set nobody could ever approve anyone,
    // so the first signed-in user becomes an approved admin.
    match admin::admin_set_is_empty(&state.pool).await {
        Ok(true) => {
            if let Err(e) = admin::grant(&state.pool, &state.changes, user_id, None).await {
                tracing::error!(error = %e, "first-admin grant failed");
            }
            if let Err(e) = profile::set_approval(&state.pool, &state.changes, user_id, true).await {
                tracing::error!(error = %e, "first-admin approval failed");
            }
        }
        Ok(false) => {}
        Err(e) => tracing::error!(error = %e, "admin set check failed"),
    }

    let token = match session::create_session(&state.pool, &state.changes, user_id).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let jar = jar.add(session_cookie(token));
    (jar, Json(serde_json::json!({ "ok": true }))).into_response()
}

/// `POST /api/auth/logout` — delete the session, clear the cookie.
///
/// A backend failure keeps the session (and returns 500) so the client
/// does not pretend to be signed out while the credential stays valid.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(e) = session::delete_session(&state.pool, &state.changes, &auth.token).await {
        tracing::error!(error = %e, "session deletion failed");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let jar = CookieJar::new().add(clear_session_cookie());
    (jar, StatusCode::NO_CONTENT).into_response()
}

/// `POST /api/auth/ws-ticket` — create a one-time WS ticket.
pub async fn ws_ticket(State(state): State<AppState>, auth: AuthUser) -> Result<Json<serde_json::Value>, StatusCode> {
    let ticket = session::create_ws_ticket(&state.pool, auth.user.id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(serde_json::json!({ "ticket": ticket })))
}
