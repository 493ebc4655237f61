use super::*;

#[tokio::test]
async fn subscribers_receive_published_events() {
    let hub = ChangeHub::new();
    let mut rx = hub.subscribe();

    let row_id = Uuid::new_v4();
    hub.publish(BOOKS_TABLE, Op::Insert, Some(row_id), serde_json::json!({"title": "Dune"}));

    let event = rx.recv().await.expect("event");
    assert_eq!(event.table, BOOKS_TABLE);
    assert_eq!(event.op, Op::Insert);
    assert_eq!(event.row_id.as_deref(), Some(row_id.to_string().as_str()));
    assert_eq!(event.row["title"], "Dune");
}

#[tokio::test]
async fn publish_without_receivers_does_not_panic() {
    let hub = ChangeHub::new();
    hub.publish(PROFILES_TABLE, Op::Update, None, serde_json::json!({}));
}

#[tokio::test]
async fn each_subscriber_gets_every_event() {
    let hub = ChangeHub::new();
    let mut a = hub.subscribe();
    let mut b = hub.subscribe();

    hub.publish(SESSIONS_TABLE, Op::Delete, Some(Uuid::new_v4()), serde_json::json!({}));

    assert_eq!(a.recv().await.expect("a").table, SESSIONS_TABLE);
    assert_eq!(b.recv().await.expect("b").table, SESSIONS_TABLE);
}

#[test]
fn build_event_stamps_identity_and_time() {
    let event = build_event(BOOKS_TABLE, Op::Update, None, serde_json::json!({"x": 1}));
    assert!(!event.id.is_empty());
    assert!(event.ts > 0);
    assert!(event.row_id.is_none());
}
