//! In-process backend used by tests and local development.
//!
//! Mirrors the REST backend's observable behaviour: credential checks,
//! duplicate-account and bad-credential errors, document filters, and
//! blob removal. Any operation can be made to fail on demand through
//! [`MemoryBackend::fail`].

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};
use serde_json::{Map, Value};
use tracing::debug;

use storeit_core::error::AppError;
use storeit_core::result::AppResult;
use storeit_core::types::{Query, unique_id};
use storeit_entity::{Account, Document, DocumentList, Session};

use crate::backend::{BlobBackend, Credential, DocumentBackend, IdentityBackend};

/// Operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    /// `create_account`.
    CreateAccount,
    /// `create_email_password_session`.
    CreateSession,
    /// `get_account`.
    GetAccount,
    /// `delete_session`.
    DeleteSession,
    /// `create_document`.
    CreateDocument,
    /// `get_document`.
    GetDocument,
    /// `list_documents`.
    ListDocuments,
    /// `update_document`.
    UpdateDocument,
    /// `delete_document`.
    DeleteDocument,
    /// `delete_blob`.
    DeleteBlob,
}

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    password: String,
}

type DocumentKey = (String, String, String);

/// Dashmap-backed implementation of every backend trait.
#[derive(Debug)]
pub struct MemoryBackend {
    api_key: String,
    /// Account id -> account.
    accounts: DashMap<String, StoredAccount>,
    /// Session secret -> session.
    sessions: DashMap<String, Session>,
    /// (database, collection, document id) -> document.
    documents: DashMap<DocumentKey, Document>,
    /// (bucket, blob id) -> size in bytes.
    blobs: DashMap<(String, String), u64>,
    failures: DashSet<FailurePoint>,
    /// Successful `get_document` calls.
    document_reads: AtomicUsize,
}

impl MemoryBackend {
    /// Creates an empty backend accepting `api_key` as the service credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            accounts: DashMap::new(),
            sessions: DashMap::new(),
            documents: DashMap::new(),
            blobs: DashMap::new(),
            failures: DashSet::new(),
            document_reads: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent call of `point` fail until [`recover`](Self::recover).
    pub fn fail(&self, point: FailurePoint) {
        self.failures.insert(point);
    }

    /// Clears an injected failure.
    pub fn recover(&self, point: FailurePoint) {
        self.failures.remove(&point);
    }

    /// Stores a blob, standing in for the upload path.
    pub fn put_blob(&self, bucket_id: &str, blob_id: &str, size: u64) {
        self.blobs
            .insert((bucket_id.to_string(), blob_id.to_string()), size);
    }

    /// Whether a blob is present.
    pub fn has_blob(&self, bucket_id: &str, blob_id: &str) -> bool {
        self.blobs
            .contains_key(&(bucket_id.to_string(), blob_id.to_string()))
    }

    /// Stores a document directly, bypassing credential checks.
    pub fn put_document(&self, document: Document) {
        let key = (
            document.database_id.clone(),
            document.collection_id.clone(),
            document.id.clone(),
        );
        self.documents.insert(key, document);
    }

    /// Reads a document directly, bypassing credential checks.
    pub fn document(&self, database_id: &str, collection_id: &str, id: &str) -> Option<Document> {
        self.documents
            .get(&key(database_id, collection_id, id))
            .map(|d| d.value().clone())
    }

    /// Number of live sessions for an account.
    pub fn session_count(&self, account_id: &str) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.value().account_id == account_id)
            .count()
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of documents served through `get_document`.
    pub fn document_reads(&self) -> usize {
        self.document_reads.load(Ordering::Relaxed)
    }

    fn check(&self, point: FailurePoint) -> AppResult<()> {
        if self.failures.contains(&point) {
            debug!(?point, "Injected backend failure");
            return Err(AppError::backend(format!("injected failure at {point:?}")));
        }
        Ok(())
    }

    fn require_key(&self, credential: &Credential) -> AppResult<()> {
        match credential {
            Credential::ApiKey(key) if *key == self.api_key => Ok(()),
            Credential::ApiKey(_) => Err(AppError::backend("401 general_unauthorized_scope: invalid API key")),
            Credential::Session(_) => Err(AppError::forbidden("403: API key required")),
        }
    }

    fn session_for(&self, credential: &Credential) -> AppResult<Session> {
        match credential {
            Credential::Session(secret) => self
                .sessions
                .get(secret)
                .map(|s| s.value().clone())
                .ok_or_else(|| AppError::no_session("401 user_unauthorized: session not found")),
            Credential::ApiKey(_) => Err(AppError::no_session(
                "401 general_unauthorized_scope: no session on a key client",
            )),
        }
    }

    fn require_any(&self, credential: &Credential) -> AppResult<()> {
        match credential {
            Credential::ApiKey(_) => self.require_key(credential),
            Credential::Session(_) => self.session_for(credential).map(|_| ()),
        }
    }
}

fn key(database_id: &str, collection_id: &str, id: &str) -> DocumentKey {
    (
        database_id.to_string(),
        collection_id.to_string(),
        id.to_string(),
    )
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[async_trait]
impl IdentityBackend for MemoryBackend {
    async fn create_account(
        &self,
        _credential: &Credential,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> AppResult<Account> {
        self.check(FailurePoint::CreateAccount)?;

        let email_taken = self
            .accounts
            .iter()
            .any(|a| a.value().account.email.eq_ignore_ascii_case(email));
        if email_taken || self.accounts.contains_key(account_id) {
            return Err(AppError::account_exists(
                "409 user_already_exists: an account with this email exists",
            ));
        }

        let account = Account {
            id: account_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: Some(Utc::now()),
        };
        self.accounts.insert(
            account_id.to_string(),
            StoredAccount {
                account: account.clone(),
                password: password.to_string(),
            },
        );
        Ok(account)
    }

    async fn create_email_password_session(
        &self,
        _credential: &Credential,
        email: &str,
        password: &str,
    ) -> AppResult<Session> {
        self.check(FailurePoint::CreateSession)?;

        let account_id = self
            .accounts
            .iter()
            .find(|a| a.value().account.email.eq_ignore_ascii_case(email) && a.value().password == password)
            .map(|a| a.key().clone())
            .ok_or_else(|| {
                AppError::invalid_credentials("401 user_invalid_credentials: invalid credentials")
            })?;

        let session = Session {
            id: unique_id(),
            account_id,
            secret: format!("{}{}", unique_id(), unique_id()),
            expire: None,
        };
        self.sessions.insert(session.secret.clone(), session.clone());
        Ok(session)
    }

    async fn get_account(&self, credential: &Credential) -> AppResult<Account> {
        self.check(FailurePoint::GetAccount)?;

        let session = self.session_for(credential)?;
        self.accounts
            .get(&session.account_id)
            .map(|a| a.value().account.clone())
            .ok_or_else(|| AppError::no_session("401 user_unauthorized: account removed"))
    }

    async fn delete_session(&self, credential: &Credential, session_id: &str) -> AppResult<()> {
        self.check(FailurePoint::DeleteSession)?;

        let current = self.session_for(credential)?;
        let secret = if session_id == "current" || session_id == current.id {
            Some(current.secret.clone())
        } else {
            self.sessions
                .iter()
                .find(|s| s.value().id == session_id && s.value().account_id == current.account_id)
                .map(|s| s.key().clone())
        };

        match secret {
            Some(secret) => {
                self.sessions.remove(&secret);
                Ok(())
            }
            None => Err(AppError::not_found("404 user_session_not_found")),
        }
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn create_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        self.check(FailurePoint::CreateDocument)?;
        self.require_any(credential)?;

        let k = key(database_id, collection_id, document_id);
        if self.documents.contains_key(&k) {
            return Err(AppError::backend("409 document_already_exists"));
        }

        let mut document = Document::new(database_id, collection_id, document_id, data);
        let created = now();
        document.created_at = Some(created.clone());
        document.updated_at = Some(created);
        self.documents.insert(k, document.clone());
        Ok(document)
    }

    async fn get_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<Document> {
        self.check(FailurePoint::GetDocument)?;
        self.require_any(credential)?;

        let document = self
            .document(database_id, collection_id, document_id)
            .ok_or_else(|| AppError::not_found("404 document_not_found"))?;
        self.document_reads.fetch_add(1, Ordering::Relaxed);
        Ok(document)
    }

    async fn list_documents(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> AppResult<DocumentList> {
        self.check(FailurePoint::ListDocuments)?;
        self.require_any(credential)?;

        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| {
                let (db, coll, _) = entry.key();
                db == database_id && coll == collection_id
            })
            .filter(|entry| queries.iter().all(|q| q.matches(&entry.value().data)))
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(DocumentList {
            total: documents.len() as u64,
            documents,
        })
    }

    async fn update_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        self.check(FailurePoint::UpdateDocument)?;
        self.require_any(credential)?;

        let mut entry = self
            .documents
            .get_mut(&key(database_id, collection_id, document_id))
            .ok_or_else(|| AppError::not_found("404 document_not_found"))?;
        entry.apply_patch(&data);
        entry.updated_at = Some(now());
        Ok(entry.value().clone())
    }

    async fn delete_document(
        &self,
        credential: &Credential,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> AppResult<()> {
        self.check(FailurePoint::DeleteDocument)?;
        self.require_any(credential)?;

        self.documents
            .remove(&key(database_id, collection_id, document_id))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("404 document_not_found"))
    }
}

#[async_trait]
impl BlobBackend for MemoryBackend {
    async fn delete_blob(
        &self,
        credential: &Credential,
        bucket_id: &str,
        blob_id: &str,
    ) -> AppResult<()> {
        self.check(FailurePoint::DeleteBlob)?;
        self.require_any(credential)?;

        self.blobs
            .remove(&(bucket_id.to_string(), blob_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("404 storage_file_not_found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storeit_core::ErrorKind;

    fn admin() -> Credential {
        Credential::ApiKey("key".to_string())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let backend = MemoryBackend::new("key");
        backend
            .create_account(&admin(), "a1", "a@x.com", "password1", "Ada")
            .await
            .unwrap();
        let err = backend
            .create_account(&admin(), "a2", "A@x.com", "password2", "Other")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccountExists);
        assert_eq!(backend.account_count(), 1);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let backend = MemoryBackend::new("key");
        backend
            .create_account(&admin(), "a1", "a@x.com", "password1", "Ada")
            .await
            .unwrap();

        let err = backend
            .create_email_password_session(&admin(), "a@x.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);

        let session = backend
            .create_email_password_session(&admin(), "a@x.com", "password1")
            .await
            .unwrap();
        let credential = Credential::Session(session.secret.clone());
        assert_eq!(backend.get_account(&credential).await.unwrap().id, "a1");

        backend.delete_session(&credential, "current").await.unwrap();
        assert_eq!(backend.session_count("a1"), 0);
        let err = backend.get_account(&credential).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoSession);
    }

    #[tokio::test]
    async fn test_list_documents_filters_by_equality() {
        let backend = MemoryBackend::new("key");
        for (id, account) in [("p1", "a1"), ("p2", "a2")] {
            backend
                .create_document(
                    &admin(),
                    "db",
                    "users",
                    id,
                    json!({ "accountId": account }).as_object().unwrap().clone(),
                )
                .await
                .unwrap();
        }

        let list = backend
            .list_documents(&admin(), "db", "users", &[Query::equal("accountId", "a2")])
            .await
            .unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.documents[0].id, "p2");
    }

    #[tokio::test]
    async fn test_injected_failure_until_recovered() {
        let backend = MemoryBackend::new("key");
        backend.put_blob("bucket", "b1", 10);
        backend.fail(FailurePoint::DeleteBlob);

        let err = backend.delete_blob(&admin(), "bucket", "b1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Backend);
        assert!(backend.has_blob("bucket", "b1"));

        backend.recover(FailurePoint::DeleteBlob);
        backend.delete_blob(&admin(), "bucket", "b1").await.unwrap();
        assert!(!backend.has_blob("bucket", "b1"));
    }
}
