//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use storeit_api::{AppState, build_router};
use storeit_core::config::{
    AppConfig, BackendConfig, Environment, LoggingConfig, ServerConfig, SessionConfig,
};
use storeit_entity::{Document, FileRecord, to_fields};
use storeit_gateway::MemoryBackend;

pub const PASSWORD: &str = "password123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// In-memory backend for seeding and inspection
    pub backend: Arc<MemoryBackend>,
}

/// A collected response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    /// `name=value` of the session cookie, ready for a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with("appwrite-session="))
            .map(|c| c.split(';').next().unwrap().to_string())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap())
    }
}

pub fn test_config(environment: Environment) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            environment,
            ..ServerConfig::default()
        },
        backend: BackendConfig {
            endpoint: "http://backend.test/v1".to_string(),
            project_id: "proj".to_string(),
            database_id: "db".to_string(),
            users_collection_id: "users".to_string(),
            files_collection_id: "files".to_string(),
            bucket_id: "bucket".to_string(),
            api_key: "service-key".to_string(),
            request_timeout_seconds: 5,
        },
        session: SessionConfig::default(),
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_environment(Environment::Development)
    }

    pub fn with_environment(environment: Environment) -> Self {
        let backend = Arc::new(MemoryBackend::new("service-key"));
        let state = AppState::new(Arc::new(test_config(environment)), backend.clone());
        Self {
            router: build_router(state),
            backend,
        }
    }

    /// Send a request and collect the response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sign up and return the session cookie and account id.
    pub async fn sign_up(&self, email: &str) -> (String, String) {
        let response = self
            .request(
                Method::POST,
                "/api/auth/sign-up",
                Some(serde_json::json!({
                    "email": email,
                    "password": PASSWORD,
                    "fullName": "Test User",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        let cookie = response.session_cookie().unwrap();
        let account_id = response.body["data"]["id"].as_str().unwrap().to_string();
        (cookie, account_id)
    }

    /// Seed file `f1` (`draft.pdf`, blob `b1`) owned by `owner_id`.
    pub fn put_file(&self, owner_id: &str, users: &[&str]) -> FileRecord {
        let file = FileRecord {
            id: "f1".to_string(),
            name: "draft.pdf".to_string(),
            extension: "pdf".to_string(),
            blob_id: "b1".to_string(),
            owner_id: owner_id.to_string(),
            users: users.iter().map(|u| u.to_string()).collect(),
            file_type: Some("document".to_string()),
            size: Some(2048),
        };
        let mut fields = to_fields(&file).unwrap();
        fields.remove("$id");
        self.backend
            .put_document(Document::new("db", "files", "f1", fields));
        self.backend.put_blob("bucket", "b1", 2048);
        file
    }

    pub fn stored_file(&self) -> Option<FileRecord> {
        self.backend
            .document("db", "files", "f1")
            .map(|d| d.parse().unwrap())
    }
}
