use super::*;
use crate::net::types::{Session, User};

fn signed_in_state() -> AuthState {
    let mut state = AuthState::default();
    state.apply_session(Session {
        user: User { id: "u1".to_owned(), email: "alice@example.com".to_owned() },
        expires_at: None,
    });
    state.set_approval(true, true);
    state.finish_initialization();
    state
}

#[test]
fn success_resets_all_four_fields_and_clears_loading() {
    let mut state = signed_in_state();
    state.set_loading(true);

    apply_sign_out_success(&mut state);

    assert!(state.session.is_none());
    assert!(state.user.is_none());
    assert!(!state.is_approved && !state.is_admin);
    assert!(!state.loading);
}

#[test]
fn success_preserves_initialization() {
    let mut state = signed_in_state();
    apply_sign_out_success(&mut state);
    assert!(state.initialized);
}

#[test]
fn failure_leaves_auth_fields_exactly_as_they_were() {
    let before = signed_in_state();
    let mut state = before.clone();
    state.set_loading(true);

    apply_sign_out_failure(&mut state);

    assert_eq!(state.session, before.session);
    assert_eq!(state.user, before.user);
    assert_eq!(state.is_approved, before.is_approved);
    assert_eq!(state.is_admin, before.is_admin);
    assert!(!state.loading);
}
