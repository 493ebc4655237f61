//! Error taxonomy for the session core.
//!
//! PROPAGATION
//! ===========
//! `ApprovalLookupError` is always absorbed by the resolver and mapped to
//! the safe default (`approved = false`, `is_admin = false`) — approval
//! failures never block initialization. `AuthError` during bootstrap is
//! absorbed but forces a reset to the signed-out state plus a visible
//! notice; during sign-out it leaves state untouched plus a notice, so the
//! user is not silently logged out client-side while still authenticated
//! server-side. `SubscriptionError`s are logged and swallowed; the
//! subscription registry survives them. No error path may leave the
//! loading gate stuck.

/// Credential fetch or sign-out failure at the auth backend.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request never produced a response.
    #[error("auth request failed: {0}")]
    Transport(String),
    /// The backend answered with an unexpected status.
    #[error("auth endpoint returned status {0}")]
    Status(u16),
    /// The response body could not be decoded.
    #[error("auth payload malformed: {0}")]
    Malformed(String),
}

/// Profile or admin-membership read failure.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalLookupError {
    /// The request never produced a response.
    #[error("approval lookup failed: {0}")]
    Transport(String),
    /// The backend answered with an unexpected status.
    #[error("approval lookup returned status {0}")]
    Status(u16),
    /// The response body could not be decoded.
    #[error("approval payload malformed: {0}")]
    Malformed(String),
}

/// Realtime channel failure.
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    /// The websocket ticket request failed.
    #[error("websocket ticket request failed: {0}")]
    Ticket(String),
    /// The websocket could not be opened.
    #[error("websocket connect failed: {0}")]
    Connect(String),
    /// An incoming change event could not be decoded.
    #[error("change event decode failed: {0}")]
    Decode(String),
}
