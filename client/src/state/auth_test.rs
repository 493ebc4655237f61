use super::*;

fn sample_session() -> Session {
    Session {
        user: User { id: "u1".to_owned(), email: "alice@example.com".to_owned() },
        expires_at: Some("2026-09-01T00:00:00Z".to_owned()),
    }
}

#[test]
fn default_state_gates_are_closed() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(!state.initialized);
    assert!(!state.is_ready());
    assert!(!state.is_signed_in());
}

#[test]
fn apply_session_sets_session_and_user_together() {
    let mut state = AuthState::default();
    state.apply_session(sample_session());
    assert!(state.is_signed_in());
    assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
}

#[test]
fn reset_pairs_null_session_with_cleared_privilege_flags() {
    let mut state = AuthState::default();
    state.apply_session(sample_session());
    state.set_approval(true, true);

    state.reset_to_signed_out();

    assert!(state.session.is_none());
    assert!(state.user.is_none());
    assert!(!state.is_approved);
    assert!(!state.is_admin);
}

#[test]
fn no_snapshot_pairs_null_session_with_approval() {
    // Structural check: the only setter that nulls the session is
    // reset_to_signed_out, which clears the flags in the same call.
    let mut state = AuthState::default();
    state.apply_session(sample_session());
    state.set_approval(true, false);
    state.reset_to_signed_out();
    assert!(state.session.is_none() && !state.is_approved && !state.is_admin);
}

#[test]
fn finish_initialization_opens_both_gates() {
    let mut state = AuthState::default();
    state.finish_initialization();
    assert!(state.initialized);
    assert!(!state.loading);
    assert!(state.is_ready());
}

#[test]
fn finish_initialization_is_idempotent() {
    let mut state = AuthState::default();
    state.finish_initialization();
    state.finish_initialization();
    assert!(state.is_ready());
}

#[test]
fn reset_does_not_revert_initialization() {
    let mut state = AuthState::default();
    state.finish_initialization();
    state.reset_to_signed_out();
    assert!(state.initialized);
}

#[test]
fn loading_gate_blocks_readiness_during_sign_out_cycle() {
    let mut state = AuthState::default();
    state.finish_initialization();
    state.set_loading(true);
    assert!(!state.is_ready());
    state.set_loading(false);
    assert!(state.is_ready());
}
