use super::*;
use crate::net::types::{Session, User};

fn ready_state(signed_in: bool) -> AuthState {
    let mut state = AuthState::default();
    if signed_in {
        state.apply_session(Session {
            user: User { id: "u1".to_owned(), email: "alice@example.com".to_owned() },
            expires_at: None,
        });
    }
    state.finish_initialization();
    state
}

#[test]
fn guard_is_inert_before_initialization() {
    let state = AuthState::default();
    assert_eq!(guard_target(&state, "/"), None);
    assert_eq!(guard_target(&state, SIGN_IN_PATH), None);
}

#[test]
fn guard_is_inert_while_loading() {
    let mut state = ready_state(false);
    state.set_loading(true);
    assert_eq!(guard_target(&state, "/"), None);
}

#[test]
fn signed_out_off_sign_in_route_redirects_to_sign_in() {
    let state = ready_state(false);
    assert_eq!(guard_target(&state, "/"), Some(SIGN_IN_PATH));
    assert_eq!(guard_target(&state, "/book/b1"), Some(SIGN_IN_PATH));
    assert_eq!(guard_target(&state, "/admin"), Some(SIGN_IN_PATH));
}

#[test]
fn signed_out_on_sign_in_route_stays_put() {
    let state = ready_state(false);
    assert_eq!(guard_target(&state, SIGN_IN_PATH), None);
}

#[test]
fn signed_in_on_sign_in_route_redirects_home() {
    let state = ready_state(true);
    assert_eq!(guard_target(&state, SIGN_IN_PATH), Some(DEFAULT_AUTHENTICATED_PATH));
}

#[test]
fn signed_in_elsewhere_stays_put() {
    let state = ready_state(true);
    assert_eq!(guard_target(&state, "/"), None);
    assert_eq!(guard_target(&state, "/book/b1"), None);
}
