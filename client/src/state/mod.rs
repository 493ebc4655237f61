//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `books`, `ui`) so individual
//! components can depend on small focused models. Each model lives in an
//! `RwSignal` provided via context by the root `App` component.

pub mod auth;
pub mod books;
pub mod ui;
