//! Session/approval bootstrap and realtime synchronization core.
//!
//! ARCHITECTURE
//! ============
//! Three writers feed the auth store after mount: the one-shot
//! [`bootstrap`] task, the [`events`] listener on the auth lifecycle
//! stream, and the [`profile_sync`] listener scoped to the signed-in
//! user's profile row. Each write derives from a fresh self-consistent
//! read, so last-write-wins needs no coordination beyond the single UI
//! task. The [`resolver`] is the shared read path for approval and admin
//! status; [`sign_out`] owns credential invalidation and local cleanup.

pub mod bootstrap;
pub mod error;
pub mod events;
pub mod profile_sync;
pub mod resolver;
pub mod sign_out;
