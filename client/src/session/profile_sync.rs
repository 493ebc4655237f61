//! Profile-change listener — live re-sync when the signed-in user's
//! profile row changes out-of-band (e.g. an admin toggles approval).
//!
//! DESIGN
//! ======
//! Teardown-then-setup is keyed on the current user id: when the id
//! changes, the old channel is released before any new one is installed.
//! With no signed-in user nothing is installed at all — a deliberate no-op
//! rather than an unscoped subscription. A matching change re-runs the
//! bootstrap's session-fetch step and approval resolution; failures inside
//! that path are logged and never tear the subscription down.

#[cfg(test)]
#[path = "profile_sync_test.rs"]
mod profile_sync_test;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use changefeed::ChangeEvent;
use leptos::prelude::*;

use crate::net::change_client::{Channel, ChangeFeedHandle};
use crate::session::bootstrap;
use crate::state::auth::AuthState;

/// Table carrying per-user profile rows.
pub const PROFILES_TABLE: &str = "profiles";

/// Whether `event` is a change to the signed-in user's own profile row.
///
/// The subscription is already row-filtered server-side; this re-check
/// keeps the identity match explicit at the consumer.
pub(crate) fn is_own_profile_change(event: &ChangeEvent, user_id: &str) -> bool {
    event.table == PROFILES_TABLE && event.row_id.as_deref() == Some(user_id)
}

/// Install the profile-change listener, re-keying the subscription on
/// every user change and releasing it on teardown.
pub fn install(auth: RwSignal<AuthState>, feed: ChangeFeedHandle) {
    let current: Arc<Mutex<Option<Channel>>> = Arc::default();
    let alive = Arc::new(AtomicBool::new(true));

    let current_cleanup = current.clone();
    let alive_cleanup = alive.clone();
    let feed_cleanup = feed.clone();
    on_cleanup(move || {
        alive_cleanup.store(false, Ordering::Relaxed);
        if let Some(channel) = current_cleanup.lock().unwrap().take() {
            feed_cleanup.unsubscribe(&channel);
        }
    });

    // Memoized so the subscription churns only when the id actually
    // changes, not on every unrelated auth-state write.
    let scoped_user = Memo::new(move |_| auth.with(|state| state.user.as_ref().map(|u| u.id.clone())));

    Effect::new(move || {
        let user_id = scoped_user.get();

        // Explicit teardown of the previous channel before any new setup.
        if let Some(channel) = current.lock().unwrap().take() {
            feed.unsubscribe(&channel);
        }

        // No signed-in user: install nothing.
        let Some(user_id) = user_id else {
            return;
        };

        let alive = alive.clone();
        let filter_id = user_id.clone();
        let channel = feed.subscribe(PROFILES_TABLE, Some(user_id), move |event| {
            if !is_own_profile_change(event, &filter_id) {
                return;
            }
            if !alive.load(Ordering::Relaxed) {
                return;
            }
            leptos::task::spawn_local(bootstrap::resync(auth));
        });

        *current.lock().unwrap() = Some(channel);
    });
}
