//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store is the single point of synchronization for the
//! bootstrap task, the auth-event listener, and the profile-change
//! listener. Route guards and user-aware components read it to coordinate
//! redirects and approval-gated rendering.
//!
//! DESIGN
//! ======
//! All mutation funnels through the setter methods below so every write
//! site is enumerable. The only operation that clears the session also
//! clears both privilege flags, so no observable snapshot can pair a null
//! session with `is_approved` or `is_admin` set.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Session, User};

/// Authentication state tracking the current session, user, approval and
/// admin flags, and the initialization gates.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    /// Active credential bundle, `None` when signed out.
    pub session: Option<Session>,
    /// User associated with the session.
    pub user: Option<User>,
    /// Whether the user's profile has been approved by an admin.
    pub is_approved: bool,
    /// Whether the user is a member of the admin set.
    pub is_admin: bool,
    /// Loading gate: true while bootstrap or sign-out is in flight.
    pub loading: bool,
    /// Set by the first bootstrap outcome (or by an auth event that races
    /// ahead of it); never reverts.
    pub initialized: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            user: None,
            is_approved: false,
            is_admin: false,
            loading: true,
            initialized: false,
        }
    }
}

impl AuthState {
    /// Adopt a fresh session and its user.
    pub fn apply_session(&mut self, session: Session) {
        self.user = Some(session.user.clone());
        self.session = Some(session);
    }

    /// Record the resolved approval and admin status.
    pub fn set_approval(&mut self, approved: bool, is_admin: bool) {
        self.is_approved = approved;
        self.is_admin = is_admin;
    }

    /// Clear session, user, and both privilege flags in one update.
    pub fn reset_to_signed_out(&mut self) {
        self.session = None;
        self.user = None;
        self.is_approved = false;
        self.is_admin = false;
    }

    /// Mark startup complete and release the loading gate.
    pub fn finish_initialization(&mut self) {
        self.initialized = true;
        self.loading = false;
    }

    /// Flip the loading gate (sign-out cycle).
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Whether the navigation guard and render gate may act.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.initialized && !self.loading
    }

    /// Whether a session is currently held.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
