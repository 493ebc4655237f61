//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds HTTP + websocket endpoints and stitches API routes
//! with Leptos SSR rendering under a single Axum router.

pub mod auth;
pub mod books;
pub mod users;
pub mod ws;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Shared API routes used by the SSR app and websocket clients.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/session", get(auth::current_session))
        .route("/api/auth/email/request-code", post(auth::request_email_code))
        .route("/api/auth/email/verify-code", post(auth::verify_email_code))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/ws-ticket", post(auth::ws_ticket))
        .route("/api/users", get(users::user_directory))
        .route(
            "/api/users/{id}/profile",
            get(users::get_profile).patch(users::patch_profile),
        )
        .route("/api/users/{id}/approval", put(users::set_approval))
        .route(
            "/api/admins/{id}",
            get(users::admin_membership)
                .put(users::grant_admin)
                .delete(users::revoke_admin),
        )
        .route("/api/books", get(books::list_books).post(books::create_book))
        .route(
            "/api/books/{id}",
            get(books::book_detail).delete(books::delete_book),
        )
        .route("/api/books/{id}/lend", post(books::lend_book))
        .route("/api/books/{id}/return", post(books::return_book))
        .route("/api/books/{id}/comments", post(books::post_comment))
        .route("/api/books/{id}/rating", put(books::set_rating))
        .route("/api/books/{id}/reactions", post(books::toggle_reaction))
        .route("/api/isbn/{isbn}", get(books::isbn_preview))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application: API routes + Leptos SSR + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing
/// or malformed `[package.metadata.leptos]`/workspace metadata).
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    // Serve Leptos static assets (WASM, CSS, JS) from the site root /pkg
    // directory.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg"))))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
