use super::*;

#[test]
fn backoff_doubles_until_capped() {
    assert_eq!(next_backoff(INITIAL_BACKOFF_MS), 2000);
    assert_eq!(next_backoff(4000), 8000);
    assert_eq!(next_backoff(8000), MAX_BACKOFF_MS);
    assert_eq!(next_backoff(MAX_BACKOFF_MS), MAX_BACKOFF_MS);
}

#[test]
fn channel_ids_are_sequential_and_distinct() {
    assert_eq!(channel_id(1), "ch-1");
    assert_ne!(channel_id(1), channel_id(2));
}

#[test]
fn ws_url_uses_wss_for_https_pages() {
    let url = ws_url("https://stacks.example.com/", "stacks.example.com", "t0ken");
    assert_eq!(url, "wss://stacks.example.com/api/ws?ticket=t0ken");
}

#[test]
fn ws_url_uses_ws_for_http_pages() {
    let url = ws_url("http://localhost:3000/", "localhost:3000", "t0ken");
    assert_eq!(url, "ws://localhost:3000/api/ws?ticket=t0ken");
}

#[test]
fn subscribe_message_carries_table_and_row_filter() {
    let sub = Subscription {
        id: "ch-7".to_owned(),
        table: "profiles".to_owned(),
        row_id: Some("u1".to_owned()),
    };
    let parsed: Control = serde_json::from_str(&subscribe_message(&sub)).expect("control json");
    assert_eq!(
        parsed,
        Control::Subscribe {
            id: "ch-7".to_owned(),
            table: "profiles".to_owned(),
            row_id: Some("u1".to_owned()),
        }
    );
}

#[test]
fn unsubscribe_message_round_trips() {
    let parsed: Control = serde_json::from_str(&unsubscribe_message("ch-3")).expect("control json");
    assert_eq!(parsed, Control::Unsubscribe { id: "ch-3".to_owned() });
}
