//! In-process broadcast hub for realtime change events.
//!
//! DESIGN
//! ======
//! Every server-side mutation of a watched table publishes a
//! [`ChangeEvent`] here; websocket connections hold a receiver and forward
//! events matching their subscriptions. Session events carry the owning
//! user id as the row id so subscribers never see raw tokens, and the
//! websocket layer can scope their delivery to that user's connections.
//!
//! Publishing never blocks and never fails: with no connected receivers
//! the event is dropped. Consumers refetch on change, so a dropped or
//! lagged event costs one refresh, not correctness.

#[cfg(test)]
#[path = "changes_test.rs"]
mod changes_test;

use changefeed::{ChangeEvent, Op};
use time::OffsetDateTime;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Table name constants shared by publishers and the websocket layer.
pub const BOOKS_TABLE: &str = "books";
pub const PROFILES_TABLE: &str = "profiles";
pub const SESSIONS_TABLE: &str = "sessions";

const HUB_CAPACITY: usize = 256;

/// Clone-cheap handle to the broadcast channel.
#[derive(Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    /// Open a receiver for one websocket connection.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish one row-level change to all connected receivers.
    pub fn publish(&self, table: &str, op: Op, row_id: Option<Uuid>, row: serde_json::Value) {
        let event = build_event(table, op, row_id, row);
        let receivers = self.tx.send(event).unwrap_or(0);
        tracing::debug!(table, ?op, receivers, "change event published");
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

fn build_event(table: &str, op: Op, row_id: Option<Uuid>, row: serde_json::Value) -> ChangeEvent {
    #[allow(clippy::cast_possible_truncation)]
    let ts = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    ChangeEvent {
        id: Uuid::new_v4().to_string(),
        ts,
        table: table.to_owned(),
        op,
        row_id: row_id.map(|id| id.to_string()),
        row,
    }
}
