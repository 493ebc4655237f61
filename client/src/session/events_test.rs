use super::*;

fn session_event(op: Op) -> ChangeEvent {
    ChangeEvent {
        id: "evt-1".to_owned(),
        ts: 1,
        table: SESSIONS_TABLE.to_owned(),
        op,
        row_id: Some("tok-1".to_owned()),
        row: serde_json::json!({
            "user_id": "u1",
            "email": "alice@example.com",
            "expires_at": "2026-09-01T00:00:00Z"
        }),
    }
}

#[test]
fn insert_event_yields_a_session() {
    let session = session_from_event(&session_event(Op::Insert)).expect("session");
    assert_eq!(session.user.id, "u1");
    assert_eq!(session.user.email, "alice@example.com");
    assert_eq!(session.expires_at.as_deref(), Some("2026-09-01T00:00:00Z"));
}

#[test]
fn update_event_yields_a_refreshed_session() {
    assert!(session_from_event(&session_event(Op::Update)).is_some());
}

#[test]
fn delete_event_yields_signed_out() {
    assert!(session_from_event(&session_event(Op::Delete)).is_none());
}

#[test]
fn malformed_row_degrades_to_signed_out() {
    let mut event = session_event(Op::Insert);
    event.row = serde_json::json!({ "email": "alice@example.com" });
    assert!(session_from_event(&event).is_none());
}

#[test]
fn apply_with_session_adopts_and_requests_resolution() {
    let mut state = AuthState::default();
    let session = session_from_event(&session_event(Op::Insert));
    let resolve_for = apply_auth_event(&mut state, session);

    assert!(state.is_signed_in());
    assert_eq!(resolve_for.as_deref(), Some("u1"));
}

#[test]
fn apply_without_session_resets_all_four_fields() {
    let mut state = AuthState::default();
    apply_auth_event(&mut state, session_from_event(&session_event(Op::Insert)));
    state.set_approval(true, true);

    let resolve_for = apply_auth_event(&mut state, None);

    assert!(resolve_for.is_none());
    assert!(state.session.is_none());
    assert!(state.user.is_none());
    assert!(!state.is_approved && !state.is_admin);
}

#[test]
fn every_event_completes_initialization() {
    let mut state = AuthState::default();
    assert!(!state.initialized);
    apply_auth_event(&mut state, None);
    assert!(state.initialized && !state.loading);
}
