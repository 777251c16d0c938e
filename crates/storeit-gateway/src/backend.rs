//! Transport traits for the external identity, document and blob APIs.
//!
//! Implementations exist for the hosted REST API ([`AppwriteBackend`]) and
//! an in-process store (`MemoryBackend`, behind the `memory` feature).
//! Every call carries the [`Credential`] it is made with, so one backend
//! instance serves both the elevated and the session clients.
//!
//! [`AppwriteBackend`]: crate::providers::appwrite::AppwriteBackend

use async_trait::async_trait;
use serde_json::{Map, Value};

use storeit_core::AppResult;
use storeit_core::types::Query;
use storeit_entity::{Account, Document, DocumentList, Session};

/// The credential a request is authenticated with.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Service-level API key; only ever held by the trusted side.
    ApiKey(String),
    /// End-user session secret taken from the session cookie.
    Session(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Session(_) => f.write_str("Session(<redacted>)"),
        }
    }
}

/// Account and session endpoints.
#[async_trait]
pub trait IdentityBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Register a new account.
    async fn create_account(
        &self,
        credential: &Credential,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> AppResult<Account>;

    /// Exchange email and password for a session (including its secret).
    async fn create_email_password_session(
        &self,
        credential: &Credential,
        email: &str,
        password: &str,
    ) -> AppResult<Session>;

    /// The account the credential's session belongs to.
    async fn get_account(&self, credential: &Credential) -> AppResult<Account>;

    /// Revoke a session; `"current"` means the credential's own session.
    async fn delete_session(&self, credential: &Credential, session_id: &str) -> AppResult<()>;
}

/// Document store endpoints.
#[async_trait]
pub trait DocumentBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Create a document with a caller-chosen id.
    async fn create_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document>;

    /// Fetch a document by id.
    async fn get_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<Document>;

    /// List documents matching every query.
    async fn list_documents(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> AppResult<DocumentList>;

    /// Overwrite the given attributes of a document.
    async fn update_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document>;

    /// Remove a document.
    async fn delete_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<()>;
}

/// Object store endpoints.
#[async_trait]
pub trait BlobBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Remove a blob from a bucket.
    async fn delete_blob(&self, credential: &Credential, bucket_id: &str, blob_id: &str)
    -> AppResult<()>;
}

/// Everything the gateway needs from one backend.
pub trait Backend: IdentityBackend + DocumentBackend + BlobBackend {}

impl<T> Backend for T where T: IdentityBackend + DocumentBackend + BlobBackend {}
