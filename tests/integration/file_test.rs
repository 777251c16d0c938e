//! File actions over HTTP.

use axum::http::{Method, StatusCode};
use serde_json::json;

use storeit_gateway::FailurePoint;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_file_actions_require_session() {
    let app = TestApp::new();
    let (_, owner) = app.sign_up("owner@x.com").await;
    app.put_file(&owner, &[]);

    let response = app
        .request(
            Method::PATCH,
            "/api/files/f1/name",
            Some(json!({"name": "report"})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "NO_SESSION");
    assert_eq!(app.stored_file().unwrap().name, "draft.pdf");
}

#[tokio::test]
async fn test_rename_keeps_extension() {
    let app = TestApp::new();
    let (cookie, owner) = app.sign_up("owner@x.com").await;
    app.put_file(&owner, &[]);
    let reads = app.backend.document_reads();

    let response = app
        .request(
            Method::PATCH,
            "/api/files/f1/name",
            Some(json!({"name": "report"})),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.backend.document_reads(), reads + 1);
    assert_eq!(response.body["data"]["displayName"], "report");
    assert_eq!(response.body["data"]["extension"], "pdf");
    assert_eq!(app.stored_file().unwrap().name, "report.pdf");
}

#[tokio::test]
async fn test_share_and_revoke() {
    let app = TestApp::new();
    let (cookie, owner) = app.sign_up("owner@x.com").await;
    app.put_file(&owner, &[]);

    let shared = app
        .request(
            Method::PUT,
            "/api/files/f1/users",
            Some(json!({"emails": ["a@x.com", "b@x.com", "c@x.com", "a@x.com"]})),
            Some(&cookie),
        )
        .await;
    assert_eq!(shared.status, StatusCode::OK);
    assert_eq!(
        shared.body["data"]["users"],
        json!(["a@x.com", "b@x.com", "c@x.com"])
    );

    let reads = app.backend.document_reads();
    let revoked = app
        .request(
            Method::DELETE,
            "/api/files/f1/users/b@x.com",
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert_eq!(app.backend.document_reads(), reads + 1);
    assert_eq!(app.stored_file().unwrap().users, vec!["a@x.com", "c@x.com"]);
}

#[tokio::test]
async fn test_failed_revoke_leaves_readers() {
    let app = TestApp::new();
    let (cookie, owner) = app.sign_up("owner@x.com").await;
    app.put_file(&owner, &["a@x.com", "b@x.com", "c@x.com"]);
    app.backend.fail(FailurePoint::UpdateDocument);

    let response = app
        .request(
            Method::DELETE,
            "/api/files/f1/users/b@x.com",
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "MUTATION_FAILED");
    assert_eq!(
        app.stored_file().unwrap().users,
        vec!["a@x.com", "b@x.com", "c@x.com"]
    );
}

#[tokio::test]
async fn test_delete_with_blob_failure_orphans_blob() {
    let app = TestApp::new();
    let (cookie, owner) = app.sign_up("owner@x.com").await;
    app.put_file(&owner, &[]);
    app.backend.fail(FailurePoint::DeleteBlob);

    let response = app
        .request(Method::DELETE, "/api/files/f1", None, Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["message"], "The action could not be completed.");
    assert!(app.stored_file().is_none());
    assert!(app.backend.has_blob("bucket", "b1"));
}

#[tokio::test]
async fn test_delete_removes_record_and_blob() {
    let app = TestApp::new();
    let (cookie, owner) = app.sign_up("owner@x.com").await;
    app.put_file(&owner, &[]);
    let reads = app.backend.document_reads();

    let response = app
        .request(Method::DELETE, "/api/files/f1", None, Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.backend.document_reads(), reads + 1);
    assert!(app.stored_file().is_none());
    assert!(!app.backend.has_blob("bucket", "b1"));
}

#[tokio::test]
async fn test_reader_can_download_but_not_mutate() {
    let app = TestApp::new();
    let (_, owner) = app.sign_up("owner@x.com").await;
    let (reader_cookie, _) = app.sign_up("reader@x.com").await;
    let (stranger_cookie, _) = app.sign_up("stranger@x.com").await;
    app.put_file(&owner, &["reader@x.com"]);

    let download = app
        .request(
            Method::GET,
            "/api/files/f1/download",
            None,
            Some(&reader_cookie),
        )
        .await;
    assert_eq!(download.status, StatusCode::SEE_OTHER);
    assert_eq!(
        download.location(),
        Some("http://backend.test/v1/storage/buckets/bucket/files/b1/download?project=proj")
    );

    let rename = app
        .request(
            Method::PATCH,
            "/api/files/f1/name",
            Some(json!({"name": "mine"})),
            Some(&reader_cookie),
        )
        .await;
    assert_eq!(rename.status, StatusCode::FORBIDDEN);

    let details = app
        .request(Method::GET, "/api/files/f1", None, Some(&stranger_cookie))
        .await;
    assert_eq!(details.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_action_menu_and_health() {
    let app = TestApp::new();

    let actions = app
        .request(Method::GET, "/api/files/actions", None, None)
        .await;
    let kinds: Vec<&str> = actions.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["rename", "details", "share", "download", "delete"]);

    let health = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");
}
