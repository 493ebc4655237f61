//! WebSocket handler — the realtime change feed.
//!
//! DESIGN
//! ======
//! On upgrade (gated by a one-time ticket), the connection holds a
//! receiver on the change hub and a set of client-managed subscriptions.
//! A `select!` loop interleaves:
//! - Incoming control messages (JSON text) → subscribe/unsubscribe
//! - Hub events → filter by subscription + session scoping → forward as
//!   protobuf binary
//!
//! Filtering is pure (`should_deliver`) so delivery policy is testable
//! without a socket. `sessions` events are additionally scoped to the
//! connection's own user regardless of subscription filters, so one user
//! can never observe another's auth lifecycle.
//!
//! LIFECYCLE
//! =========
//! A lagged receiver (slow client) drops the missed events and keeps the
//! connection: consumers refetch on change, so a gap self-heals on the
//! next event. Close or send failure tears the connection down; the
//! broadcast receiver drops with it.

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use changefeed::{ChangeEvent, Control, Subscription, encode_event, event_matches};
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services;
use crate::services::changes::SESSIONS_TABLE;
use crate::state::AppState;

// =============================================================================
// DELIVERY POLICY
// =============================================================================

/// Apply one control message to the connection's subscription set.
pub(crate) fn apply_control(subs: &mut Vec<Subscription>, control: Control) {
    match control {
        Control::Subscribe { id, table, row_id } => {
            // Re-subscribing under the same id replaces the old filter.
            subs.retain(|s| s.id != id);
            subs.push(Subscription { id, table, row_id });
        }
        Control::Unsubscribe { id } => subs.retain(|s| s.id != id),
    }
}

/// Whether `event` should be forwarded on a connection owned by
/// `user_id` holding `subs`.
pub(crate) fn should_deliver(subs: &[Subscription], user_id: Uuid, event: &ChangeEvent) -> bool {
    if event.table == SESSIONS_TABLE && event.row_id.as_deref() != Some(user_id.to_string().as_str()) {
        return false;
    }
    subs.iter().any(|sub| event_matches(sub, event))
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(ticket) = params.get("ticket") else {
        return (StatusCode::UNAUTHORIZED, "ticket required").into_response();
    };

    let user_id = match services::session::consume_ws_ticket(&state.pool, ticket).await {
        Ok(Some(uid)) => uid,
        Ok(None) => return (StatusCode::UNAUTHORIZED, "invalid or expired ticket").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "ws ticket validation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "ticket validation error").into_response();
        }
    };

    ws.on_upgrade(move |socket| run_ws(socket, state, user_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, user_id: Uuid) {
    let mut events = state.changes.subscribe();
    let mut subs: Vec<Subscription> = Vec::new();

    info!(%user_id, "change feed: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => handle_control_text(&mut subs, user_id, text.as_str()),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if !should_deliver(&subs, user_id, &event) {
                        continue;
                    }
                    let bytes = encode_event(&event);
                    if socket.send(Message::Binary(bytes.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(%user_id, missed, "change feed: receiver lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    info!(%user_id, "change feed: client disconnected");
}

fn handle_control_text(subs: &mut Vec<Subscription>, user_id: Uuid, text: &str) {
    match serde_json::from_str::<Control>(text) {
        Ok(control) => apply_control(subs, control),
        Err(e) => warn!(%user_id, error = %e, "change feed: invalid control message"),
    }
}
