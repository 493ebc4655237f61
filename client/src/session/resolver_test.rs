use super::*;

fn approved_profile() -> ProfileRow {
    ProfileRow {
        user_id: "u1".to_owned(),
        display_name: Some("Alice".to_owned()),
        avatar_url: None,
        is_approved: true,
    }
}

fn unapproved_profile() -> ProfileRow {
    ProfileRow { is_approved: false, ..approved_profile() }
}

#[test]
fn approved_non_admin_combines_both_halves() {
    let status = status_from_lookups(&Ok(Some(approved_profile())), &Ok(false));
    assert_eq!(status, ApprovalStatus { approved: true, is_admin: false });
}

#[test]
fn approved_admin_combines_both_halves() {
    let status = status_from_lookups(&Ok(Some(approved_profile())), &Ok(true));
    assert_eq!(status, ApprovalStatus { approved: true, is_admin: true });
}

#[test]
fn missing_profile_yields_unapproved() {
    let status = status_from_lookups(&Ok(None), &Ok(true));
    assert_eq!(status, ApprovalStatus { approved: false, is_admin: true });
}

#[test]
fn profile_error_fails_soft_without_aborting_admin_half() {
    let status = status_from_lookups(
        &Err(ApprovalLookupError::Status(500)),
        &Ok(true),
    );
    assert_eq!(status, ApprovalStatus { approved: false, is_admin: true });
}

#[test]
fn admin_error_fails_soft_without_aborting_approval_half() {
    let status = status_from_lookups(
        &Ok(Some(approved_profile())),
        &Err(ApprovalLookupError::Transport("offline".to_owned())),
    );
    assert_eq!(status, ApprovalStatus { approved: true, is_admin: false });
}

#[test]
fn both_errors_yield_the_safe_default() {
    let status = status_from_lookups(
        &Err(ApprovalLookupError::Malformed("bad json".to_owned())),
        &Err(ApprovalLookupError::Status(503)),
    );
    assert_eq!(status, ApprovalStatus::default());
}

#[test]
fn unapproved_profile_is_not_upgraded_by_admin_membership() {
    let status = status_from_lookups(&Ok(Some(unapproved_profile())), &Ok(true));
    assert_eq!(status, ApprovalStatus { approved: false, is_admin: true });
}

#[test]
fn resolution_is_idempotent_for_unchanged_inputs() {
    let profile = Ok(Some(approved_profile()));
    let admin = Ok(false);
    assert_eq!(status_from_lookups(&profile, &admin), status_from_lookups(&profile, &admin));
}
