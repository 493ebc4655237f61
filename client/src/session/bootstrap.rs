//! Session bootstrapper — one-shot startup sequence establishing AuthState.
//!
//! LIFECYCLE
//! =========
//! 1. Fetch the current session from the backend (null when signed out).
//! 2. Mark initialization complete and release the loading gate regardless
//!    of outcome, so the render gate and navigation guard never hang.
//! 3. Populate or reset the store, then resolve approval for a live
//!    session.
//!
//! A liveness flag captured at spawn time is checked before every state
//! write so a torn-down view never receives late updates. A fetch error
//! resets to the signed-out state and surfaces a notice; approval-lookup
//! failures are already absorbed inside the resolver.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;

use crate::net::api;
use crate::net::types::Session;
use crate::session::error::AuthError;
use crate::session::resolver;
use crate::state::auth::AuthState;
use crate::state::ui::UiState;

/// What the async driver should do after the store update.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct BootstrapStep {
    /// Resolve approval for this user id, when a session was adopted.
    pub resolve_for: Option<String>,
    /// Surface this notice, when the fetch failed.
    pub notice: Option<String>,
}

/// Apply the session-fetch outcome to the store in one update.
///
/// Initialization completes on every path, including failure.
pub(crate) fn apply_session_outcome(
    state: &mut AuthState,
    outcome: Result<Option<Session>, AuthError>,
) -> BootstrapStep {
    let step = match outcome {
        Ok(None) => {
            state.reset_to_signed_out();
            BootstrapStep { resolve_for: None, notice: None }
        }
        Ok(Some(session)) => {
            let user_id = session.user.id.clone();
            state.apply_session(session);
            BootstrapStep { resolve_for: Some(user_id), notice: None }
        }
        Err(err) => {
            state.reset_to_signed_out();
            BootstrapStep { resolve_for: None, notice: Some(format!("Sign-in check failed: {err}")) }
        }
    };
    state.finish_initialization();
    step
}

/// Spawn the one-shot bootstrap for this mount.
pub fn spawn_bootstrap(auth: RwSignal<AuthState>, ui: RwSignal<UiState>) {
    let alive = Arc::new(AtomicBool::new(true));
    let alive_task = alive.clone();
    on_cleanup(move || alive.store(false, Ordering::Relaxed));

    leptos::task::spawn_local(async move {
        run_bootstrap(auth, ui, &alive_task).await;
    });
}

async fn run_bootstrap(auth: RwSignal<AuthState>, ui: RwSignal<UiState>, alive: &AtomicBool) {
    let outcome = api::fetch_current_session().await;
    if !alive.load(Ordering::Relaxed) {
        return;
    }

    let mut step = BootstrapStep { resolve_for: None, notice: None };
    auth.update(|state| {
        step = apply_session_outcome(state, outcome);
    });
    if let Some(message) = step.notice {
        ui.update(|u| u.set_notice(message));
    }

    if let Some(user_id) = step.resolve_for {
        let status = resolver::resolve_approval(&user_id).await;
        if !alive.load(Ordering::Relaxed) {
            return;
        }
        auth.update(|state| state.set_approval(status.approved, status.is_admin));
    }
}

/// Re-run the session-fetch step and approval resolution without touching
/// listeners or the initialization gate.
///
/// Used by the profile-change listener so out-of-band approval/role edits
/// propagate live. Errors are logged; they must not crash the caller.
pub(crate) async fn resync(auth: RwSignal<AuthState>) {
    match api::fetch_current_session().await {
        Ok(Some(session)) => {
            let user_id = session.user.id.clone();
            auth.update(|state| state.apply_session(session));

            let status = resolver::resolve_approval(&user_id).await;
            auth.update(|state| state.set_approval(status.approved, status.is_admin));
        }
        Ok(None) => auth.update(AuthState::reset_to_signed_out),
        Err(err) => leptos::logging::warn!("session resync failed: {err}"),
    }
}
