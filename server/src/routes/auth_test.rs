use super::*;

// =============================================================================
// env_bool — uses unique env var names to avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on"].iter().enumerate() {
        let key = format!("__TEST_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_case_insensitive() {
    for (i, val) in ["TRUE", "True", "YES", "On"].iter().enumerate() {
        let key = format!("__TEST_EB_CI_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_invalid_returns_none() {
    let key = "__TEST_EB_INVALID_5521__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_unset_returns_none() {
    assert_eq!(env_bool("__TEST_EB_SURELY_UNSET_XYZ_77__"), None);
}

#[test]
fn env_bool_whitespace_trimmed() {
    let key = "__TEST_EB_WS_311__";
    unsafe { std::env::set_var(key, "  true  ") };
    assert_eq!(env_bool(key), Some(true));
    unsafe { std::env::remove_var(key) };
}

// =============================================================================
// cookie_secure — tested via the https-inference logic only, since the
// COOKIE_SECURE / PUBLIC_BASE_URL globals race with parallel tests.
// =============================================================================

#[test]
fn cookie_secure_https_inference_logic() {
    assert!("https://stacks.example.com".starts_with("https://"));
    assert!(!"http://localhost:3000".starts_with("https://"));
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_cookie_is_http_only_and_scoped_to_root() {
    let cookie = session_cookie("tok".to_owned());
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
}

#[test]
fn clear_cookie_expires_immediately() {
    let cookie = clear_session_cookie();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn email_auth_errors_map_to_expected_statuses() {
    assert_eq!(
        email_auth_status(&email_auth::EmailAuthError::InvalidEmail),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        email_auth_status(&email_auth::EmailAuthError::InvalidCode),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        email_auth_status(&email_auth::EmailAuthError::VerificationFailed),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        email_auth_status(&email_auth::EmailAuthError::EmailDelivery("x".to_owned())),
        StatusCode::BAD_GATEWAY
    );
}
