//! Session lifecycle over HTTP.

use axum::http::{Method, StatusCode};
use serde_json::json;

use storeit_core::config::Environment;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_sign_up_sets_session_cookie() {
    let app = TestApp::new();

    let response = app
        .request(
            Method::POST,
            "/api/auth/sign-up",
            Some(json!({"email": "ada@x.com", "password": PASSWORD, "fullName": "Ada Lovelace"})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["email"], "ada@x.com");

    let set_cookie = response
        .set_cookies()
        .into_iter()
        .find(|c| c.starts_with("appwrite-session="))
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Path=/"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_production_cookie_is_secure() {
    let app = TestApp::with_environment(Environment::Production);

    let response = app
        .request(
            Method::POST,
            "/api/auth/sign-up",
            Some(json!({"email": "ada@x.com", "password": PASSWORD, "fullName": "Ada Lovelace"})),
            None,
        )
        .await;

    let set_cookie = response.set_cookies().join("\n");
    assert!(set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = TestApp::new();

    let response = app
        .request(
            Method::POST,
            "/api/auth/sign-up",
            Some(json!({"email": "nope", "password": "short", "fullName": "Al"})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
    assert!(response.set_cookies().is_empty());
    assert_eq!(app.backend.account_count(), 0);
}

#[tokio::test]
async fn test_duplicate_sign_up_writes_no_cookie() {
    let app = TestApp::new();
    app.sign_up("ada@x.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/sign-up",
            Some(json!({"email": "ada@x.com", "password": PASSWORD, "fullName": "Someone Else"})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "ACCOUNT_EXISTS");
    assert_eq!(
        response.body["message"],
        "An account with this email already exists."
    );
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let app = TestApp::new();
    let (cookie, _) = app.sign_up("ada@x.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/sign-in",
            Some(json!({"email": "ada@x.com", "password": "wrong-password"})),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "INVALID_CREDENTIALS");
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_sign_in_returns_new_session() {
    let app = TestApp::new();
    let (first, account_id) = app.sign_up("ada@x.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/sign-in",
            Some(json!({"email": "ada@x.com", "password": PASSWORD})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["accountId"], account_id.as_str());
    assert!(response.body["data"].get("secret").is_none());
    let second = response.session_cookie().unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_me_and_profile() {
    let app = TestApp::new();

    let anonymous = app.request(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert!(anonymous.body["data"].is_null());

    let stale = app
        .request(
            Method::GET,
            "/api/auth/me",
            None,
            Some("appwrite-session=not-a-session"),
        )
        .await;
    assert_eq!(stale.status, StatusCode::OK);
    assert!(stale.body["data"].is_null());

    let (cookie, account_id) = app.sign_up("ada@x.com").await;
    let me = app
        .request(Method::GET, "/api/auth/me", None, Some(&cookie))
        .await;
    assert_eq!(me.body["data"]["id"], account_id.as_str());

    let profile = app
        .request(Method::GET, "/api/auth/profile", None, Some(&cookie))
        .await;
    assert_eq!(profile.body["data"]["accountId"], account_id.as_str());
    assert_eq!(profile.body["data"]["fullName"], "Test User");
    assert_eq!(
        profile.body["data"]["avatar"],
        "/assets/icons/avatar-placeholder.svg"
    );
}

#[tokio::test]
async fn test_sign_out_twice_redirects_both_times() {
    let app = TestApp::new();
    let (cookie, account_id) = app.sign_up("ada@x.com").await;

    let first = app
        .request(Method::POST, "/api/auth/sign-out", None, Some(&cookie))
        .await;
    let second = app
        .request(Method::POST, "/api/auth/sign-out", None, Some(&cookie))
        .await;

    for response in [&first, &second] {
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/sign-in"));
    }
    assert!(
        first
            .set_cookies()
            .iter()
            .any(|c| c.starts_with("appwrite-session=;") && c.contains("Max-Age=0"))
    );
    assert_eq!(app.backend.session_count(&account_id), 0);

    let me = app
        .request(Method::GET, "/api/auth/me", None, Some(&cookie))
        .await;
    assert!(me.body["data"].is_null());
}
