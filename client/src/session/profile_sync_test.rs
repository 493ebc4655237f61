use super::*;
use changefeed::Op;

fn profile_event(row_id: Option<&str>) -> ChangeEvent {
    ChangeEvent {
        id: "evt-1".to_owned(),
        ts: 1,
        table: PROFILES_TABLE.to_owned(),
        op: Op::Update,
        row_id: row_id.map(str::to_owned),
        row: serde_json::json!({ "user_id": row_id, "is_approved": true }),
    }
}

#[test]
fn own_row_change_matches() {
    assert!(is_own_profile_change(&profile_event(Some("u1")), "u1"));
}

#[test]
fn other_users_row_does_not_match() {
    assert!(!is_own_profile_change(&profile_event(Some("u2")), "u1"));
}

#[test]
fn missing_row_id_does_not_match() {
    assert!(!is_own_profile_change(&profile_event(None), "u1"));
}

#[test]
fn other_table_does_not_match() {
    let mut event = profile_event(Some("u1"));
    event.table = "books".to_owned();
    assert!(!is_own_profile_change(&event, "u1"));
}

#[test]
fn delete_of_own_row_still_matches() {
    let mut event = profile_event(Some("u1"));
    event.op = Op::Delete;
    assert!(is_own_profile_change(&event, "u1"));
}
