//! Credential-scoped backend clients.
//!
//! [`AdminClient`] and [`SessionClient`] are distinct types over the same
//! [`BackendClient`] so a function signature states which privilege it
//! needs. Neither can be built outside [`IdentityGateway`].
//!
//! [`IdentityGateway`]: crate::gateway::IdentityGateway

use std::ops::Deref;
use std::sync::Arc;

use serde_json::{Map, Value};

use storeit_core::AppResult;
use storeit_core::types::Query;
use storeit_entity::{Account, Document, DocumentList, Session};

use crate::backend::{Backend, BlobBackend, Credential, DocumentBackend, IdentityBackend};

/// A backend handle bound to one credential.
#[derive(Debug, Clone)]
pub struct BackendClient {
    backend: Arc<dyn Backend>,
    credential: Credential,
}

impl BackendClient {
    pub(crate) fn new(backend: Arc<dyn Backend>, credential: Credential) -> Self {
        Self {
            backend,
            credential,
        }
    }

    /// Account and session calls.
    pub fn account(&self) -> AccountApi<'_> {
        AccountApi { client: self }
    }

    /// Document store calls.
    pub fn databases(&self) -> DatabasesApi<'_> {
        DatabasesApi { client: self }
    }

    /// Object store calls.
    pub fn storage(&self) -> StorageApi<'_> {
        StorageApi { client: self }
    }
}

/// Account endpoints for a client.
#[derive(Debug, Clone, Copy)]
pub struct AccountApi<'a> {
    client: &'a BackendClient,
}

impl AccountApi<'_> {
    /// Register a new account with a caller-chosen id.
    pub async fn create(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> AppResult<Account> {
        self.client
            .backend
            .create_account(&self.client.credential, account_id, email, password, name)
            .await
    }

    /// Exchange credentials for a session.
    pub async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Session> {
        self.client
            .backend
            .create_email_password_session(&self.client.credential, email, password)
            .await
    }

    /// The account behind the client's session.
    pub async fn get(&self) -> AppResult<Account> {
        self.client.backend.get_account(&self.client.credential).await
    }

    /// Revoke a session by id, or `"current"`.
    pub async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        self.client
            .backend
            .delete_session(&self.client.credential, session_id)
            .await
    }
}

/// Document endpoints for a client.
#[derive(Debug, Clone, Copy)]
pub struct DatabasesApi<'a> {
    client: &'a BackendClient,
}

impl DatabasesApi<'_> {
    /// Create a document.
    pub async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        self.client
            .backend
            .create_document(
                &self.client.credential,
                database_id,
                collection_id,
                document_id,
                data,
            )
            .await
    }

    /// Fetch a document.
    pub async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<Document> {
        self.client
            .backend
            .get_document(&self.client.credential, database_id, collection_id, document_id)
            .await
    }

    /// List documents matching all queries.
    pub async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> AppResult<DocumentList> {
        self.client
            .backend
            .list_documents(&self.client.credential, database_id, collection_id, queries)
            .await
    }

    /// Overwrite attributes of a document.
    pub async fn update_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        self.client
            .backend
            .update_document(
                &self.client.credential,
                database_id,
                collection_id,
                document_id,
                data,
            )
            .await
    }

    /// Remove a document.
    pub async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<()> {
        self.client
            .backend
            .delete_document(&self.client.credential, database_id, collection_id, document_id)
            .await
    }
}

/// Object store endpoints for a client.
#[derive(Debug, Clone, Copy)]
pub struct StorageApi<'a> {
    client: &'a BackendClient,
}

impl StorageApi<'_> {
    /// Remove a blob.
    pub async fn delete_file(&self, bucket_id: &str, blob_id: &str) -> AppResult<()> {
        self.client
            .backend
            .delete_blob(&self.client.credential, bucket_id, blob_id)
            .await
    }
}

/// Client authenticated with the service credential.
///
/// Only constructed on the trusted side; never handed to end-user code.
#[derive(Debug, Clone)]
pub struct AdminClient(pub(crate) BackendClient);

impl Deref for AdminClient {
    type Target = BackendClient;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Client authenticated with the current user's session secret.
#[derive(Debug, Clone)]
pub struct SessionClient(pub(crate) BackendClient);

impl Deref for SessionClient {
    type Target = BackendClient;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
