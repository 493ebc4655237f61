//! WebSocket change-feed client for realtime row-change notifications.
//!
//! The feed manages the websocket lifecycle: ticket fetch, connection,
//! reconnection with exponential backoff, event decode, and callback
//! dispatch to registered subscriptions. It is the transport behind the
//! auth-event and profile-change listeners and the catalog live refresh.
//!
//! All websocket logic is gated behind `#[cfg(feature = "hydrate")]` since
//! it requires a browser environment; on the server the handle is inert.
//!
//! ERROR HANDLING
//! ==============
//! Transport and decode failures are logged as `SubscriptionError`s and
//! absorbed; registered subscriptions survive reconnects because the
//! registry lives outside the connection loop and is replayed on connect.

#[cfg(test)]
#[path = "change_client_test.rs"]
mod change_client_test;

use changefeed::ChangeEvent;
#[cfg(any(test, feature = "hydrate"))]
use changefeed::{Control, Subscription};
#[cfg(feature = "hydrate")]
use changefeed::event_matches;

#[cfg(feature = "hydrate")]
use std::cell::RefCell;
#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(any(test, feature = "hydrate"))]
const INITIAL_BACKOFF_MS: u32 = 1000;
#[cfg(any(test, feature = "hydrate"))]
const MAX_BACKOFF_MS: u32 = 10_000;

/// Handle to one active subscription; pass back to release the channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    id: String,
}

#[cfg(any(test, feature = "hydrate"))]
fn next_backoff(current_ms: u32) -> u32 {
    (current_ms * 2).min(MAX_BACKOFF_MS)
}

#[cfg(any(test, feature = "hydrate"))]
fn channel_id(counter: u64) -> String {
    format!("ch-{counter}")
}

#[cfg(any(test, feature = "hydrate"))]
fn ws_url(href: &str, host: &str, ticket: &str) -> String {
    let proto = if href.starts_with("https") { "wss" } else { "ws" };
    format!("{proto}://{host}/api/ws?ticket={ticket}")
}

#[cfg(any(test, feature = "hydrate"))]
fn subscribe_message(sub: &Subscription) -> String {
    let control = Control::Subscribe {
        id: sub.id.clone(),
        table: sub.table.clone(),
        row_id: sub.row_id.clone(),
    };
    serde_json::to_string(&control).unwrap_or_default()
}

#[cfg(any(test, feature = "hydrate"))]
fn unsubscribe_message(channel_id: &str) -> String {
    let control = Control::Unsubscribe { id: channel_id.to_owned() };
    serde_json::to_string(&control).unwrap_or_default()
}

#[cfg(feature = "hydrate")]
type ChangeCallback = Rc<dyn Fn(&ChangeEvent)>;

#[cfg(feature = "hydrate")]
struct Registered {
    sub: Subscription,
    callback: ChangeCallback,
}

#[cfg(feature = "hydrate")]
thread_local! {
    static REGISTRY: RefCell<Vec<Registered>> = const { RefCell::new(Vec::new()) };
    static NEXT_CHANNEL: RefCell<u64> = const { RefCell::new(0) };
}

/// Handle for issuing change-feed subscriptions.
///
/// Clone-cheap; provided via context by the root `App` component.
#[derive(Clone)]
pub struct ChangeFeedHandle {
    #[cfg(feature = "hydrate")]
    tx: futures::channel::mpsc::UnboundedSender<String>,
}

impl ChangeFeedHandle {
    /// Register a callback for row changes on `table`, optionally narrowed
    /// to a single row. Returns the channel to release on teardown.
    ///
    /// On the server this is a no-op returning an inert channel.
    pub fn subscribe(
        &self,
        table: &str,
        row_id: Option<String>,
        callback: impl Fn(&ChangeEvent) + 'static,
    ) -> Channel {
        #[cfg(feature = "hydrate")]
        {
            let id = NEXT_CHANNEL.with(|counter| {
                let mut counter = counter.borrow_mut();
                *counter += 1;
                channel_id(*counter)
            });
            let sub = Subscription { id: id.clone(), table: table.to_owned(), row_id };
            let message = subscribe_message(&sub);
            REGISTRY.with(|registry| {
                registry
                    .borrow_mut()
                    .push(Registered { sub, callback: Rc::new(callback) });
            });
            let _ = self.tx.unbounded_send(message);
            Channel { id }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (table, row_id, &callback);
            Channel { id: String::new() }
        }
    }

    /// Release a subscription and stop server-side delivery for it.
    pub fn unsubscribe(&self, channel: &Channel) {
        #[cfg(feature = "hydrate")]
        {
            REGISTRY.with(|registry| {
                registry.borrow_mut().retain(|r| r.sub.id != channel.id);
            });
            let _ = self.tx.unbounded_send(unsubscribe_message(&channel.id));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = channel;
        }
    }
}

/// Dispatch one decoded event to every matching registered callback.
///
/// Callbacks are snapshotted before invocation so a callback may itself
/// subscribe or unsubscribe without re-entering the registry borrow.
#[cfg(feature = "hydrate")]
fn dispatch_event(event: &ChangeEvent) {
    let callbacks: Vec<ChangeCallback> = REGISTRY.with(|registry| {
        registry
            .borrow()
            .iter()
            .filter(|r| event_matches(&r.sub, event))
            .map(|r| r.callback.clone())
            .collect()
    });
    for callback in callbacks {
        callback(event);
    }
}

/// Spawn the change-feed lifecycle as a local async task and return the
/// subscription handle.
///
/// On the server no task is spawned and the handle is inert.
pub fn spawn_change_feed() -> ChangeFeedHandle {
    #[cfg(feature = "hydrate")]
    {
        use futures::channel::mpsc;

        let (tx, rx) = mpsc::unbounded::<String>();
        let handle = ChangeFeedHandle { tx };

        leptos::task::spawn_local(feed_loop(rx));

        handle
    }
    #[cfg(not(feature = "hydrate"))]
    {
        ChangeFeedHandle {}
    }
}

/// Main connection loop with reconnect and subscription replay.
#[cfg(feature = "hydrate")]
async fn feed_loop(rx: futures::channel::mpsc::UnboundedReceiver<String>) {
    use crate::session::error::SubscriptionError;

    let rx = Rc::new(RefCell::new(rx));
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    loop {
        // Get a one-time WS ticket.
        let ticket = match crate::net::api::create_ws_ticket().await {
            Ok(t) => t,
            Err(e) => {
                leptos::logging::warn!("{}", SubscriptionError::Ticket(e));
                gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
                backoff_ms = next_backoff(backoff_ms);
                continue;
            }
        };

        let href = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost:3000".to_owned());
        let url = ws_url(&href, &host, &ticket);

        match connect_and_run(&url, &rx).await {
            Ok(()) => {
                leptos::logging::log!("change feed disconnected cleanly");
                backoff_ms = INITIAL_BACKOFF_MS;
            }
            Err(e) => {
                leptos::logging::warn!("{e}");
            }
        }

        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = next_backoff(backoff_ms);
    }
}

/// Connect to the websocket and process messages until disconnect.
#[cfg(feature = "hydrate")]
async fn connect_and_run(
    url: &str,
    rx: &Rc<RefCell<futures::channel::mpsc::UnboundedReceiver<String>>>,
) -> Result<(), crate::session::error::SubscriptionError> {
    use crate::session::error::SubscriptionError;
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| SubscriptionError::Connect(e.to_string()))?;
    let (mut ws_write, mut ws_read) = ws.split();

    // Replay the active subscriptions so a reconnect resumes delivery.
    let replay: Vec<String> = REGISTRY.with(|registry| {
        registry
            .borrow()
            .iter()
            .map(|r| subscribe_message(&r.sub))
            .collect()
    });
    {
        use futures::SinkExt;
        for message in replay {
            if ws_write.send(Message::Text(message)).await.is_err() {
                return Err(SubscriptionError::Connect("subscription replay failed".to_owned()));
            }
        }
    }

    // Forward outgoing control messages from the handle to the socket.
    let mut rx_borrow = rx.borrow_mut();
    let send_task = async {
        use futures::SinkExt;
        while let Some(message) = rx_borrow.next().await {
            if ws_write.send(Message::Text(message)).await.is_err() {
                break;
            }
        }
    };

    // Receive loop: decode and dispatch incoming change events.
    let recv_task = async {
        while let Some(message) = ws_read.next().await {
            match message {
                Ok(Message::Bytes(bytes)) => match changefeed::decode_event(&bytes) {
                    Ok(event) => dispatch_event(&event),
                    Err(e) => {
                        leptos::logging::warn!("{}", SubscriptionError::Decode(e.to_string()));
                    }
                },
                Ok(Message::Text(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("change feed recv error: {e}");
                    break;
                }
            }
        }
    };

    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    Ok(())
}
