//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation and auth plumbing.
//! Mutating services publish change events through `changes::ChangeHub`.

pub mod admin;
pub mod ai;
pub mod book;
pub mod changes;
pub mod email_auth;
pub mod isbn;
pub mod profile;
pub mod session;
