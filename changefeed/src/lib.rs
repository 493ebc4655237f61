//! Shared change-event model and protobuf codec for realtime WS transport.
//!
//! This crate owns the wire representation used by both `server` and
//! `client`. Row snapshots stay flexible (`serde_json::Value`) while the
//! envelope is encoded over protobuf for compact binary transport.
//! Subscription control messages travel client-to-server as JSON text.

use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned by [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw bytes could not be decoded as a protobuf `WireChangeEvent`.
    #[error("failed to decode protobuf change event: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The `op` integer on the wire does not map to a known [`Op`] variant.
    #[error("invalid change op: {0}")]
    InvalidOp(i32),
}

/// Row-level operation carried by a change event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// A new row was created.
    Insert,
    /// An existing row was modified.
    Update,
    /// A row was removed. The snapshot carries the old row.
    Delete,
}

impl Op {
    /// Convert the op into its wire enum integer value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Insert => WireOp::Insert as i32,
            Self::Update => WireOp::Update as i32,
            Self::Delete => WireOp::Delete as i32,
        }
    }

    /// Parse an op from its wire enum integer value.
    fn from_i32(value: i32) -> Result<Self, CodecError> {
        match WireOp::try_from(value) {
            Ok(WireOp::Insert) => Ok(Self::Insert),
            Ok(WireOp::Update) => Ok(Self::Update),
            Ok(WireOp::Delete) => Ok(Self::Delete),
            Err(_) => Err(CodecError::InvalidOp(value)),
        }
    }
}

/// A single row-level change pushed over the realtime wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Unique identifier for this event (UUID string).
    pub id: String,
    /// Milliseconds since the Unix epoch when the change was published.
    pub ts: i64,
    /// Table the changed row belongs to, e.g. `"books"`.
    pub table: String,
    /// Row-level operation.
    pub op: Op,
    /// Primary key of the changed row (UUID string), if single-keyed.
    pub row_id: Option<String>,
    /// Row snapshot: the new row for insert/update, the old row for delete.
    pub row: Value,
}

/// Client-to-server control message managing change subscriptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Control {
    /// Start delivering events for `table`, optionally narrowed to one row.
    Subscribe {
        /// Client-chosen subscription identifier, echoed on unsubscribe.
        id: String,
        /// Table name to watch.
        table: String,
        /// Restrict delivery to events whose `row_id` equals this value.
        #[serde(skip_serializing_if = "Option::is_none")]
        row_id: Option<String>,
    },
    /// Stop delivering events for the subscription with this identifier.
    Unsubscribe {
        /// Identifier previously sent in [`Control::Subscribe`].
        id: String,
    },
}

/// One live subscription as tracked on either end of the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    /// Client-chosen subscription identifier.
    pub id: String,
    /// Watched table name.
    pub table: String,
    /// Optional single-row filter.
    pub row_id: Option<String>,
}

/// Whether `event` should be delivered to `sub`.
///
/// A subscription without a row filter admits every event on its table; a
/// row-filtered subscription admits only events carrying that exact row id.
#[must_use]
pub fn event_matches(sub: &Subscription, event: &ChangeEvent) -> bool {
    if sub.table != event.table {
        return false;
    }
    match sub.row_id.as_deref() {
        None => true,
        Some(row_id) => event.row_id.as_deref() == Some(row_id),
    }
}

/// Encode a change event into protobuf bytes.
#[must_use]
pub fn encode_event(event: &ChangeEvent) -> Vec<u8> {
    let wire = event_to_wire(event);

    let mut out = Vec::with_capacity(wire.encoded_len());
    // Encoding into a growable Vec<u8> is infallible.
    wire.encode(&mut out).unwrap_or_default();
    out
}

/// Decode protobuf bytes into a change event.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed bytes and
/// [`CodecError::InvalidOp`] for out-of-range op values.
pub fn decode_event(bytes: &[u8]) -> Result<ChangeEvent, CodecError> {
    let wire = WireChangeEvent::decode(bytes)?;
    wire_to_event(wire)
}

fn event_to_wire(event: &ChangeEvent) -> WireChangeEvent {
    WireChangeEvent {
        id: event.id.clone(),
        ts: event.ts,
        table: event.table.clone(),
        op: event.op.as_i32(),
        row_id: event.row_id.clone(),
        row: Some(json_to_proto_value(&event.row)),
    }
}

fn wire_to_event(wire: WireChangeEvent) -> Result<ChangeEvent, CodecError> {
    Ok(ChangeEvent {
        id: wire.id,
        ts: wire.ts,
        table: wire.table,
        op: Op::from_i32(wire.op)?,
        row_id: wire.row_id,
        row: wire
            .row
            .map_or(Value::Object(Map::new()), |v| proto_to_json_value(&v)),
    })
}

fn json_to_proto_value(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => {
            prost_types::value::Kind::NullValue(prost_types::NullValue::NullValue as i32)
        }
        Value::Bool(v) => prost_types::value::Kind::BoolValue(*v),
        Value::Number(v) => prost_types::value::Kind::NumberValue(v.as_f64().unwrap_or(0.0)),
        Value::String(v) => prost_types::value::Kind::StringValue(v.clone()),
        Value::Array(v) => prost_types::value::Kind::ListValue(prost_types::ListValue {
            values: v.iter().map(json_to_proto_value).collect(),
        }),
        Value::Object(v) => prost_types::value::Kind::StructValue(prost_types::Struct {
            fields: v
                .iter()
                .map(|(k, v)| (k.clone(), json_to_proto_value(v)))
                .collect(),
        }),
    };

    prost_types::Value { kind: Some(kind) }
}

fn proto_to_json_value(value: &prost_types::Value) -> Value {
    let Some(kind) = &value.kind else {
        return Value::Null;
    };

    match kind {
        prost_types::value::Kind::NullValue(_) => Value::Null,
        prost_types::value::Kind::NumberValue(v) => {
            serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
        }
        prost_types::value::Kind::StringValue(v) => Value::String(v.clone()),
        prost_types::value::Kind::BoolValue(v) => Value::Bool(*v),
        prost_types::value::Kind::StructValue(v) => Value::Object(
            v.fields
                .iter()
                .map(|(k, v)| (k.clone(), proto_to_json_value(v)))
                .collect(),
        ),
        prost_types::value::Kind::ListValue(v) => {
            Value::Array(v.values.iter().map(proto_to_json_value).collect())
        }
    }
}

#[derive(Clone, PartialEq, Message)]
struct WireChangeEvent {
    #[prost(string, tag = "1")]
    id: String,
    #[prost(int64, tag = "2")]
    ts: i64,
    #[prost(string, tag = "3")]
    table: String,
    #[prost(enumeration = "WireOp", tag = "4")]
    op: i32,
    #[prost(string, optional, tag = "5")]
    row_id: Option<String>,
    #[prost(message, optional, tag = "6")]
    row: Option<prost_types::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, prost::Enumeration)]
#[repr(i32)]
enum WireOp {
    Insert = 0,
    Update = 1,
    Delete = 2,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
