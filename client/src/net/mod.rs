//! Networking modules for HTTP + the websocket change feed.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `change_client` manages the websocket change
//! feed lifecycle, and `types` defines the shared wire schema.

pub mod api;
pub mod change_client;
pub mod types;
