use super::*;

fn sample_event() -> ChangeEvent {
    ChangeEvent {
        id: "evt-1".to_owned(),
        ts: 42,
        table: "books".to_owned(),
        op: Op::Update,
        row_id: Some("row-1".to_owned()),
        row: serde_json::json!({
            "title": "Snow Crash",
            "available": true,
            "tags": ["sf", "classic"],
            "meta": {"pages": 448.0},
            "borrowed_by": null
        }),
    }
}

#[test]
fn op_numeric_mapping_matches_wire_enum() {
    assert_eq!(Op::Insert.as_i32(), 0);
    assert_eq!(Op::Update.as_i32(), 1);
    assert_eq!(Op::Delete.as_i32(), 2);
}

#[test]
fn op_round_trips_from_wire_values() {
    assert_eq!(Op::from_i32(0).expect("op"), Op::Insert);
    assert_eq!(Op::from_i32(1).expect("op"), Op::Update);
    assert_eq!(Op::from_i32(2).expect("op"), Op::Delete);
}

#[test]
fn op_from_wire_rejects_out_of_range_value() {
    let err = Op::from_i32(99).expect_err("op should be invalid");
    assert!(matches!(err, CodecError::InvalidOp(99)));
}

#[test]
fn encode_decode_round_trip_preserves_event() {
    let event = sample_event();
    let bytes = encode_event(&event);
    let decoded = decode_event(&bytes).expect("decode should succeed");
    assert_eq!(decoded, event);
}

#[test]
fn encode_event_outputs_non_empty_binary() {
    let bytes = encode_event(&sample_event());
    assert!(!bytes.is_empty());
}

#[test]
fn decode_event_rejects_malformed_bytes() {
    let err = decode_event(&[0xff, 0x00, 0x01]).expect_err("bytes should fail");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn decode_event_rejects_invalid_wire_op() {
    let wire = WireChangeEvent {
        id: "evt-1".to_owned(),
        ts: 1,
        table: "books".to_owned(),
        op: 77,
        row_id: None,
        row: Some(json_to_proto_value(&serde_json::json!({}))),
    };
    let mut bytes = Vec::new();
    wire.encode(&mut bytes).expect("encode");

    let err = decode_event(&bytes).expect_err("op should fail");
    assert!(matches!(err, CodecError::InvalidOp(77)));
}

#[test]
fn decode_event_defaults_missing_row_to_empty_object() {
    let wire = WireChangeEvent {
        id: "evt-1".to_owned(),
        ts: 1,
        table: "profiles".to_owned(),
        op: Op::Insert.as_i32(),
        row_id: None,
        row: None,
    };
    let mut bytes = Vec::new();
    wire.encode(&mut bytes).expect("encode");

    let event = decode_event(&bytes).expect("decode");
    assert_eq!(event.row, serde_json::json!({}));
}

#[test]
fn integer_json_numbers_are_normalized_to_float_numbers() {
    let event = ChangeEvent {
        id: "evt-int".to_owned(),
        ts: 1,
        table: "book_ratings".to_owned(),
        op: Op::Insert,
        row_id: None,
        row: serde_json::json!({"stars": 4}),
    };

    let decoded = decode_event(&encode_event(&event)).expect("decode");
    assert_eq!(decoded.row.get("stars"), Some(&serde_json::json!(4.0)));
}

#[test]
fn wire_conversion_preserves_empty_optional_fields() {
    let event = ChangeEvent {
        id: String::new(),
        ts: 0,
        table: String::new(),
        op: Op::Insert,
        row_id: None,
        row: serde_json::json!({}),
    };

    let decoded = decode_event(&encode_event(&event)).expect("decode");
    assert_eq!(decoded, event);
}

#[test]
fn op_serializes_as_lowercase_json() {
    assert_eq!(serde_json::to_string(&Op::Insert).expect("serialize"), "\"insert\"");
    assert_eq!(serde_json::to_string(&Op::Delete).expect("serialize"), "\"delete\"");
}

#[test]
fn op_rejects_non_lowercase_json() {
    assert!(serde_json::from_str::<Op>("\"Insert\"").is_err());
}

#[test]
fn control_subscribe_serializes_with_action_tag() {
    let control = Control::Subscribe {
        id: "sub-1".to_owned(),
        table: "profiles".to_owned(),
        row_id: Some("user-1".to_owned()),
    };
    let json: serde_json::Value = serde_json::to_value(&control).expect("serialize");
    assert_eq!(json["action"], "subscribe");
    assert_eq!(json["table"], "profiles");
    assert_eq!(json["row_id"], "user-1");
}

#[test]
fn control_subscribe_omits_absent_row_filter() {
    let control = Control::Subscribe { id: "sub-2".to_owned(), table: "books".to_owned(), row_id: None };
    let json: serde_json::Value = serde_json::to_value(&control).expect("serialize");
    assert!(json.get("row_id").is_none());
}

#[test]
fn control_round_trips_through_json() {
    let control = Control::Unsubscribe { id: "sub-3".to_owned() };
    let text = serde_json::to_string(&control).expect("serialize");
    let restored: Control = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(restored, control);
}

#[test]
fn event_matches_requires_same_table() {
    let sub = Subscription { id: "s".to_owned(), table: "books".to_owned(), row_id: None };
    let mut event = sample_event();
    assert!(event_matches(&sub, &event));

    event.table = "profiles".to_owned();
    assert!(!event_matches(&sub, &event));
}

#[test]
fn event_matches_unfiltered_subscription_admits_any_row() {
    let sub = Subscription { id: "s".to_owned(), table: "books".to_owned(), row_id: None };
    let mut event = sample_event();
    event.row_id = None;
    assert!(event_matches(&sub, &event));
}

#[test]
fn event_matches_row_filter_requires_exact_row() {
    let sub = Subscription {
        id: "s".to_owned(),
        table: "books".to_owned(),
        row_id: Some("row-1".to_owned()),
    };
    let mut event = sample_event();
    assert!(event_matches(&sub, &event));

    event.row_id = Some("row-2".to_owned());
    assert!(!event_matches(&sub, &event));

    event.row_id = None;
    assert!(!event_matches(&sub, &event));
}
