//! # client
//!
//! Leptos + WASM frontend for the Stacks office book lending library.
//!
//! This crate contains pages, components, application state, network types,
//! the websocket change-feed client, and the session synchronization core
//! that keeps the signed-in user's approval and admin status consistent
//! with server-side changes.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod session;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
