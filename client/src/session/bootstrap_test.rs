use super::*;
use crate::net::types::User;

fn sample_session() -> Session {
    Session {
        user: User { id: "u1".to_owned(), email: "alice@example.com".to_owned() },
        expires_at: None,
    }
}

#[test]
fn success_without_session_completes_initialization_signed_out() {
    let mut state = AuthState::default();
    let step = apply_session_outcome(&mut state, Ok(None));

    assert!(state.initialized);
    assert!(!state.loading);
    assert!(state.session.is_none());
    assert!(!state.is_approved && !state.is_admin);
    assert_eq!(step, BootstrapStep { resolve_for: None, notice: None });
}

#[test]
fn success_with_session_adopts_it_and_requests_resolution() {
    let mut state = AuthState::default();
    let step = apply_session_outcome(&mut state, Ok(Some(sample_session())));

    assert!(state.initialized);
    assert!(!state.loading);
    assert!(state.is_signed_in());
    assert_eq!(step.resolve_for.as_deref(), Some("u1"));
    assert!(step.notice.is_none());
}

#[test]
fn fetch_error_resets_and_still_completes_initialization() {
    let mut state = AuthState::default();
    state.apply_session(sample_session());
    state.set_approval(true, true);

    let step = apply_session_outcome(
        &mut state,
        Err(AuthError::Transport("network down".to_owned())),
    );

    assert!(state.initialized);
    assert!(!state.loading);
    assert!(state.session.is_none());
    assert!(!state.is_approved && !state.is_admin);
    assert!(step.resolve_for.is_none());
    assert!(step.notice.as_deref().unwrap_or_default().contains("network down"));
}

#[test]
fn initialization_holds_across_every_outcome() {
    for outcome in [
        Ok(None),
        Ok(Some(sample_session())),
        Err(AuthError::Status(500)),
    ] {
        let mut state = AuthState::default();
        apply_session_outcome(&mut state, outcome);
        assert!(state.initialized && !state.loading);
    }
}

#[test]
fn repeated_outcomes_never_revert_initialization() {
    let mut state = AuthState::default();
    apply_session_outcome(&mut state, Ok(Some(sample_session())));
    apply_session_outcome(&mut state, Ok(None));
    assert!(state.initialized && !state.loading);
}
