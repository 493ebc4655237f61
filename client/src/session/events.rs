//! Auth event listener — applies backend auth lifecycle events to the store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server scopes `sessions` change delivery to the connection's own
//! user, so this stream carries exactly the sign-in, token-refresh, and
//! sign-out transitions for the current browser identity — including ones
//! initiated in another tab. Every event also completes initialization,
//! covering the case where the stream fires before the bootstrapper
//! finishes.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use changefeed::{ChangeEvent, Op};
use leptos::prelude::*;

use crate::net::change_client::ChangeFeedHandle;
use crate::net::types::{Session, User};
use crate::session::resolver;
use crate::state::auth::AuthState;

/// Table carrying auth lifecycle events.
pub const SESSIONS_TABLE: &str = "sessions";

/// Extract the session payload from a `sessions` change event.
///
/// Insert/update events carry the fresh session; delete means signed out,
/// mapped to `None`. Rows missing the expected fields also map to `None`
/// so a malformed event degrades to the signed-out reset rather than a
/// crash.
pub(crate) fn session_from_event(event: &ChangeEvent) -> Option<Session> {
    if event.op == Op::Delete {
        return None;
    }
    let user_id = event.row.get("user_id")?.as_str()?;
    let email = event.row.get("email")?.as_str()?;
    let expires_at = event
        .row
        .get("expires_at")
        .and_then(|v| v.as_str())
        .map(str::to_owned);

    Some(Session {
        user: User { id: user_id.to_owned(), email: email.to_owned() },
        expires_at,
    })
}

/// Apply one auth event payload to the store.
///
/// Returns the user id to re-resolve approval for, when a session is
/// present.
pub(crate) fn apply_auth_event(state: &mut AuthState, session: Option<Session>) -> Option<String> {
    let resolve_for = match session {
        Some(session) => {
            let user_id = session.user.id.clone();
            state.apply_session(session);
            Some(user_id)
        }
        None => {
            state.reset_to_signed_out();
            None
        }
    };
    // This stream can fire before bootstrap completes; never leave the
    // gates closed after an observed auth transition.
    state.finish_initialization();
    resolve_for
}

/// Subscribe to the auth lifecycle stream for the component's lifetime.
pub fn install(auth: RwSignal<AuthState>, feed: &ChangeFeedHandle) {
    let alive = Arc::new(AtomicBool::new(true));
    let alive_cleanup = alive.clone();

    let channel = feed.subscribe(SESSIONS_TABLE, None, move |event| {
        let session = session_from_event(event);
        let mut resolve_for = None;
        auth.update(|state| {
            resolve_for = apply_auth_event(state, session);
        });

        if let Some(user_id) = resolve_for {
            let alive = alive.clone();
            leptos::task::spawn_local(async move {
                let status = resolver::resolve_approval(&user_id).await;
                if !alive.load(Ordering::Relaxed) {
                    return;
                }
                auth.update(|state| state.set_approval(status.approved, status.is_admin));
            });
        }
    });

    let feed = feed.clone();
    on_cleanup(move || {
        alive_cleanup.store(false, Ordering::Relaxed);
        feed.unsubscribe(&channel);
    });
}
