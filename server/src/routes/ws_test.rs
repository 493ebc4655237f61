use super::*;
use changefeed::Op;

fn event(table: &str, row_id: Option<&str>) -> ChangeEvent {
    ChangeEvent {
        id: "evt-1".to_owned(),
        ts: 1,
        table: table.to_owned(),
        op: Op::Update,
        row_id: row_id.map(str::to_owned),
        row: serde_json::json!({}),
    }
}

fn sub(id: &str, table: &str, row_id: Option<&str>) -> Subscription {
    Subscription { id: id.to_owned(), table: table.to_owned(), row_id: row_id.map(str::to_owned) }
}

// =============================================================================
// apply_control
// =============================================================================

#[test]
fn subscribe_adds_a_subscription() {
    let mut subs = Vec::new();
    apply_control(
        &mut subs,
        Control::Subscribe { id: "s1".to_owned(), table: "books".to_owned(), row_id: None },
    );
    assert_eq!(subs, vec![sub("s1", "books", None)]);
}

#[test]
fn resubscribe_replaces_the_old_filter() {
    let mut subs = vec![sub("s1", "books", None)];
    apply_control(
        &mut subs,
        Control::Subscribe { id: "s1".to_owned(), table: "profiles".to_owned(), row_id: Some("u1".to_owned()) },
    );
    assert_eq!(subs, vec![sub("s1", "profiles", Some("u1"))]);
}

#[test]
fn unsubscribe_removes_only_the_named_channel() {
    let mut subs = vec![sub("s1", "books", None), sub("s2", "profiles", None)];
    apply_control(&mut subs, Control::Unsubscribe { id: "s1".to_owned() });
    assert_eq!(subs, vec![sub("s2", "profiles", None)]);
}

#[test]
fn unsubscribe_of_unknown_channel_is_a_no_op() {
    let mut subs = vec![sub("s1", "books", None)];
    apply_control(&mut subs, Control::Unsubscribe { id: "nope".to_owned() });
    assert_eq!(subs.len(), 1);
}

// =============================================================================
// should_deliver
// =============================================================================

#[test]
fn matching_subscription_delivers() {
    let subs = [sub("s1", "books", None)];
    assert!(should_deliver(&subs, Uuid::new_v4(), &event("books", Some("b1"))));
}

#[test]
fn no_subscription_means_no_delivery() {
    assert!(!should_deliver(&[], Uuid::new_v4(), &event("books", None)));
}

#[test]
fn row_filter_narrows_delivery() {
    let subs = [sub("s1", "books", Some("b1"))];
    assert!(should_deliver(&subs, Uuid::new_v4(), &event("books", Some("b1"))));
    assert!(!should_deliver(&subs, Uuid::new_v4(), &event("books", Some("b2"))));
}

#[test]
fn session_events_are_scoped_to_the_owning_user() {
    let me = Uuid::new_v4();
    let someone_else = Uuid::new_v4();
    let subs = [sub("s1", SESSIONS_TABLE, None)];

    let mine = event(SESSIONS_TABLE, Some(me.to_string().as_str()));
    assert!(should_deliver(&subs, me, &mine));
    assert!(!should_deliver(&subs, someone_else, &mine));
}

#[test]
fn session_scoping_applies_even_with_a_broad_filter() {
    let me = Uuid::new_v4();
    let subs = [sub("s1", SESSIONS_TABLE, None)];
    let anonymous = event(SESSIONS_TABLE, None);
    assert!(!should_deliver(&subs, me, &anonymous));
}

// =============================================================================
// control parsing
// =============================================================================

#[test]
fn invalid_control_text_leaves_subscriptions_untouched() {
    let mut subs = vec![sub("s1", "books", None)];
    handle_control_text(&mut subs, Uuid::new_v4(), "not json");
    assert_eq!(subs.len(), 1);
}

#[test]
fn valid_control_text_is_applied() {
    let mut subs = Vec::new();
    handle_control_text(
        &mut subs,
        Uuid::new_v4(),
        r#"{"action":"subscribe","id":"s9","table":"books"}"#,
    );
    assert_eq!(subs, vec![sub("s9", "books", None)]);
}
