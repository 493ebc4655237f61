//! Approval resolver — combined profile-approval and admin-membership read.
//!
//! DESIGN
//! ======
//! Both lookups fail soft and independently: a profile read error yields
//! `approved = false` without touching the admin half, and vice versa. The
//! resolver never errors to its caller and has no side effects beyond the
//! two reads, so invoking it twice against unchanged backend data yields
//! identical results.

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;

use crate::net::api;
use crate::net::types::ProfileRow;
use crate::session::error::ApprovalLookupError;

/// Combined approval status for one user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApprovalStatus {
    pub approved: bool,
    pub is_admin: bool,
}

/// Resolve the approval flag and admin membership for `user_id`.
///
/// Lookup failures are logged and mapped to the safe default for the
/// failing half only.
pub async fn resolve_approval(user_id: &str) -> ApprovalStatus {
    let profile = api::fetch_profile(user_id).await;
    if let Err(e) = &profile {
        leptos::logging::warn!("{e}");
    }

    let admin = api::fetch_admin_membership(user_id).await;
    if let Err(e) = &admin {
        leptos::logging::warn!("{e}");
    }

    status_from_lookups(&profile, &admin)
}

/// Combine the two lookup outcomes into a status, applying the safe
/// default to whichever half failed or found nothing.
pub(crate) fn status_from_lookups(
    profile: &Result<Option<ProfileRow>, ApprovalLookupError>,
    admin: &Result<bool, ApprovalLookupError>,
) -> ApprovalStatus {
    let approved = match profile {
        Ok(Some(row)) => row.is_approved,
        Ok(None) | Err(_) => false,
    };
    let is_admin = matches!(admin, Ok(true));

    ApprovalStatus { approved, is_admin }
}
