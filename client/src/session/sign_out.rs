//! Sign-out — backend credential invalidation plus local state reset.
//!
//! ERROR HANDLING
//! ==============
//! When the backend sign-out call fails, AuthState is left exactly as it
//! was and a notice is surfaced, so the user is not silently logged out
//! client-side while still authenticated server-side. On success the
//! store resets, app-prefixed localStorage is cleared, and navigation
//! replaces the current entry with the sign-in route.

#[cfg(test)]
#[path = "sign_out_test.rs"]
mod sign_out_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::api;
use crate::state::auth::AuthState;
use crate::state::ui::UiState;
use crate::util::auth::SIGN_IN_PATH;
use crate::util::ui_persistence;

/// Apply the successful-sign-out transition: reset all four auth fields
/// and release the loading gate.
pub(crate) fn apply_sign_out_success(state: &mut AuthState) {
    state.reset_to_signed_out();
    state.set_loading(false);
}

/// Apply the failed-sign-out transition: only the loading gate moves.
pub(crate) fn apply_sign_out_failure(state: &mut AuthState) {
    state.set_loading(false);
}

/// Run the sign-out flow as a local task.
pub fn spawn_sign_out<F>(auth: RwSignal<AuthState>, ui: RwSignal<UiState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + 'static,
{
    auth.update(|state| state.set_loading(true));

    leptos::task::spawn_local(async move {
        match api::sign_out().await {
            Ok(()) => {
                auth.update(apply_sign_out_success);
                ui.update(UiState::clear_notice);
                ui_persistence::clear_app_keys();
                navigate(SIGN_IN_PATH, NavigateOptions { replace: true, ..Default::default() });
            }
            Err(err) => {
                auth.update(apply_sign_out_failure);
                ui.update(|u| u.set_notice(format!("Sign out failed: {err}")));
            }
        }
    });
}
