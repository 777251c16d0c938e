//! REST provider for the hosted identity/document/blob backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use storeit_core::config::BackendConfig;
use storeit_core::error::{AppError, ErrorKind};
use storeit_core::result::AppResult;
use storeit_core::types::Query;
use storeit_entity::{Account, Document, DocumentList, Session};

use crate::backend::{BlobBackend, Credential, DocumentBackend, IdentityBackend};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SESSION_HEADER: &str = "X-Appwrite-Session";
const RESPONSE_FORMAT_HEADER: &str = "X-Appwrite-Response-Format";
const RESPONSE_FORMAT: &str = "1.5.0";

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: String,
}

/// REST client for the hosted backend.
#[derive(Debug, Clone)]
pub struct AppwriteBackend {
    client: Client,
    endpoint: String,
    project_id: String,
}

impl AppwriteBackend {
    /// Builds the HTTP client from backend configuration.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            project_id: config.project_id.clone(),
        })
    }

    fn url(&self, path: &str, queries: &[Query]) -> AppResult<Url> {
        let base = format!("{}{}", self.endpoint, path);
        let params = queries
            .iter()
            .map(|q| q.to_query_param().map(|p| ("queries[]", p)))
            .collect::<Result<Vec<_>, _>>()?;

        Url::parse_with_params(&base, params)
            .map_err(|e| AppError::configuration(format!("Invalid backend URL {base}: {e}")))
    }

    fn request(&self, method: Method, url: Url, credential: &Credential) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id)
            .header(RESPONSE_FORMAT_HEADER, RESPONSE_FORMAT);

        match credential {
            Credential::ApiKey(key) => builder.header(KEY_HEADER, key),
            Credential::Session(secret) => builder.header(SESSION_HEADER, secret),
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Serialization,
                    format!("Unexpected backend response: {e}"),
                    e,
                )
            })
        } else {
            Err(error_from_response(status, response.text().await.unwrap_or_default()))
        }
    }

    async fn send_empty(&self, builder: RequestBuilder) -> AppResult<()> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_response(status, response.text().await.unwrap_or_default()))
        }
    }

    fn document_path(database_id: &str, collection_id: &str) -> String {
        format!("/databases/{database_id}/collections/{collection_id}/documents")
    }
}

/// Maps a backend error type and HTTP status to an [`ErrorKind`].
pub fn classify(status: StatusCode, error_type: &str) -> ErrorKind {
    match error_type {
        "user_invalid_credentials" => ErrorKind::InvalidCredentials,
        "user_already_exists" | "user_email_already_exists" => ErrorKind::AccountExists,
        "user_unauthorized"
        | "general_unauthorized_scope"
        | "user_session_not_found"
        | "user_jwt_invalid" => ErrorKind::NoSession,
        _ => match status {
            StatusCode::UNAUTHORIZED => ErrorKind::NoSession,
            StatusCode::FORBIDDEN => ErrorKind::Forbidden,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            _ => ErrorKind::Backend,
        },
    }
}

fn error_from_response(status: StatusCode, body: String) -> AppError {
    let parsed: Option<ErrorBody> = serde_json::from_str(&body).ok();
    let (error_type, message) = match parsed {
        Some(b) => (b.error_type, b.message),
        None => (String::new(), body),
    };

    let kind = classify(status, &error_type);
    if kind == ErrorKind::Backend {
        warn!(status = %status, error_type = %error_type, message = %message, "Backend request failed");
    } else {
        debug!(status = %status, error_type = %error_type, "Backend rejected request");
    }

    AppError::new(kind, format!("{status} {error_type}: {message}"))
}

fn transport_error(err: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Backend,
        format!("Backend request failed: {err}"),
        err,
    )
}

#[async_trait]
impl IdentityBackend for AppwriteBackend {
    async fn create_account(
        &self,
        credential: &Credential,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> AppResult<Account> {
        let url = self.url("/account", &[])?;
        let body = json!({
            "userId": account_id,
            "email": email,
            "password": password,
            "name": name,
        });
        self.send(self.request(Method::POST, url, credential).json(&body))
            .await
    }

    async fn create_email_password_session(
        &self,
        credential: &Credential,
        email: &str,
        password: &str,
    ) -> AppResult<Session> {
        let url = self.url("/account/sessions/email", &[])?;
        let body = json!({ "email": email, "password": password });
        self.send(self.request(Method::POST, url, credential).json(&body))
            .await
    }

    async fn get_account(&self, credential: &Credential) -> AppResult<Account> {
        let url = self.url("/account", &[])?;
        self.send(self.request(Method::GET, url, credential)).await
    }

    async fn delete_session(&self, credential: &Credential, session_id: &str) -> AppResult<()> {
        let url = self.url(&format!("/account/sessions/{session_id}"), &[])?;
        self.send_empty(self.request(Method::DELETE, url, credential))
            .await
    }
}

#[async_trait]
impl DocumentBackend for AppwriteBackend {
    async fn create_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        let url = self.url(&Self::document_path(database_id, collection_id), &[])?;
        let body = json!({ "documentId": document_id, "data": data });
        self.send(self.request(Method::POST, url, credential).json(&body))
            .await
    }

    async fn get_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<Document> {
        let path = format!(
            "{}/{document_id}",
            Self::document_path(database_id, collection_id)
        );
        let url = self.url(&path, &[])?;
        self.send(self.request(Method::GET, url, credential)).await
    }

    async fn list_documents(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> AppResult<DocumentList> {
        let url = self.url(&Self::document_path(database_id, collection_id), queries)?;
        self.send(self.request(Method::GET, url, credential)).await
    }

    async fn update_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        let path = format!(
            "{}/{document_id}",
            Self::document_path(database_id, collection_id)
        );
        let url = self.url(&path, &[])?;
        let body = json!({ "data": data });
        self.send(self.request(Method::PATCH, url, credential).json(&body))
            .await
    }

    async fn delete_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<()> {
        let path = format!(
            "{}/{document_id}",
            Self::document_path(database_id, collection_id)
        );
        let url = self.url(&path, &[])?;
        self.send_empty(self.request(Method::DELETE, url, credential))
            .await
    }
}

#[async_trait]
impl BlobBackend for AppwriteBackend {
    async fn delete_blob(
        &self,
        credential: &Credential,
        bucket_id: &str,
        blob_id: &str,
    ) -> AppResult<()> {
        let url = self.url(&format!("/storage/buckets/{bucket_id}/files/{blob_id}"), &[])?;
        self.send_empty(self.request(Method::DELETE, url, credential))
            .await
    }
}
