//! Navigation guard applying the session redirect policy.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs as a reactive effect over every auth-state and location change,
//! not as a one-shot check, so out-of-band sign-outs eject the user from
//! the authenticated area without a reload.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::auth::AuthState;

/// The sign-in route.
pub const SIGN_IN_PATH: &str = "/auth";
/// Landing route for authenticated users.
pub const DEFAULT_AUTHENTICATED_PATH: &str = "/";

/// Redirect target for the current auth state and path, if any.
///
/// Inert until initialization completes and the loading gate clears: a
/// half-bootstrapped state must not bounce the user anywhere.
pub(crate) fn guard_target(state: &AuthState, path: &str) -> Option<&'static str> {
    if !state.is_ready() {
        return None;
    }
    if !state.is_signed_in() && path != SIGN_IN_PATH {
        return Some(SIGN_IN_PATH);
    }
    if state.is_signed_in() && path == SIGN_IN_PATH {
        return Some(DEFAULT_AUTHENTICATED_PATH);
    }
    None
}

/// Install the reactive navigation guard.
///
/// Redirects use history replace so the bounced-from route never lands on
/// the back stack. Must be called inside a `Router` context.
pub fn install_route_guard(auth: RwSignal<AuthState>) {
    let navigate = use_navigate();
    let location = use_location();

    Effect::new(move || {
        let path = location.pathname.get();
        let target = auth.with(|state| guard_target(state, &path));
        if let Some(target) = target {
            navigate(target, NavigateOptions { replace: true, ..Default::default() });
        }
    });
}
