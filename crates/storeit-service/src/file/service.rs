//! File mutations executed on behalf of the signed-in account.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{error, info, warn};

use storeit_auth::{ActiveSession, SessionCookies, SessionManager};
use storeit_core::error::AppError;
use storeit_core::result::AppResult;
use storeit_entity::file::join_name;
use storeit_entity::{Account, FileRecord};
use storeit_gateway::{AdminClient, IdentityGateway};

use super::mutation::FileMutator;

/// Binds file mutations to the caller's session.
#[derive(Debug, Clone)]
pub struct FileActionService {
    /// Client factories and backend ids.
    gateway: Arc<IdentityGateway>,
    /// Session resolution.
    sessions: Arc<SessionManager>,
}

impl FileActionService {
    /// Creates a new file action service.
    pub fn new(gateway: Arc<IdentityGateway>, sessions: Arc<SessionManager>) -> Self {
        Self { gateway, sessions }
    }

    /// Resolves the session and returns the actions it may perform.
    ///
    /// A missing or rejected session is a hard `NoSession` failure.
    pub async fn for_session(&self, cookies: &SessionCookies) -> AppResult<FileActions> {
        let session = self.sessions.require_session(cookies).await?;
        let admin = self.gateway.create_admin_client()?;
        let config = self.gateway.config();

        Ok(FileActions {
            session,
            admin,
            database_id: config.database_id.clone(),
            files_collection_id: config.files_collection_id.clone(),
            bucket_id: config.bucket_id.clone(),
        })
    }

    /// Direct fetch reference for a file's blob.
    pub fn download_url(&self, file: &FileRecord) -> String {
        self.gateway.download_url(&file.blob_id)
    }
}

/// File operations for one resolved session.
///
/// Store writes go through the elevated client; every mutation first checks
/// that the file belongs to the session's account.
#[derive(Debug, Clone)]
pub struct FileActions {
    session: ActiveSession,
    admin: AdminClient,
    database_id: String,
    files_collection_id: String,
    bucket_id: String,
}

/// A file record checked to belong to the acting account.
///
/// Only [`FileActions::owned_file`] produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedFile(FileRecord);

impl OwnedFile {
    /// Gives up the ownership proof.
    pub fn into_record(self) -> FileRecord {
        self.0
    }
}

impl Deref for OwnedFile {
    type Target = FileRecord;

    fn deref(&self) -> &FileRecord {
        &self.0
    }
}

impl FileActions {
    /// The account acting.
    pub fn account(&self) -> &Account {
        &self.session.account
    }

    /// Loads a file record.
    pub async fn get_file(&self, file_id: &str) -> AppResult<FileRecord> {
        let document = self
            .admin
            .databases()
            .get_document(&self.database_id, &self.files_collection_id, file_id)
            .await?;
        Ok(document.parse()?)
    }

    /// Loads a file record the caller owns.
    pub async fn owned_file(&self, file_id: &str) -> AppResult<OwnedFile> {
        let file = self.get_file(file_id).await?;
        if file.owner_id != self.session.account.id {
            warn!(
                file_id = %file_id,
                account_id = %self.session.account.id,
                "File mutation by non-owner rejected"
            );
            return Err(AppError::forbidden(format!(
                "File {file_id} is not owned by the caller"
            )));
        }
        Ok(OwnedFile(file))
    }

    /// Loads a file record the caller owns or was granted read access to.
    pub async fn readable_file(&self, file_id: &str) -> AppResult<FileRecord> {
        let file = self.get_file(file_id).await?;
        let account = &self.session.account;
        if file.owner_id != account.id && !file.users.iter().any(|u| u == &account.email) {
            return Err(AppError::forbidden(format!(
                "File {file_id} is not shared with the caller"
            )));
        }
        Ok(file)
    }

    /// Mutations on an already loaded owned file.
    pub fn scoped<'a>(&'a self, file: &'a OwnedFile) -> FileScope<'a> {
        FileScope {
            actions: self,
            file,
        }
    }

    /// Sets the base name; the stored name is `{name}.{extension}`.
    pub async fn rename_file(
        &self,
        file_id: &str,
        name: &str,
        extension: &str,
    ) -> AppResult<FileRecord> {
        let name = checked_name(name)?;
        let file = self.owned_file(file_id).await?;
        self.write_name(&file, name, extension).await
    }

    /// Replaces the reader list.
    ///
    /// Entries are trimmed, blanks dropped, and repeats removed keeping the
    /// first occurrence, so the stored list never holds duplicates.
    pub async fn update_file_users(
        &self,
        file_id: &str,
        emails: &[String],
    ) -> AppResult<FileRecord> {
        let file = self.owned_file(file_id).await?;
        self.write_users(&file, emails).await
    }

    /// Removes the record, then the blob.
    ///
    /// Not transactional: if the blob removal fails the record is already
    /// gone and the blob is left orphaned.
    pub async fn delete_file(&self, file_id: &str, blob_id: &str) -> AppResult<()> {
        let file = self.owned_file(file_id).await?;
        self.remove(&file, blob_id).await
    }

    async fn write_name(
        &self,
        file: &FileRecord,
        name: &str,
        extension: &str,
    ) -> AppResult<FileRecord> {
        if extension != file.extension {
            return Err(AppError::validation(format!(
                "Extension of file {} cannot change",
                file.id
            )));
        }

        let mut data = Map::new();
        data.insert("name".to_string(), Value::String(join_name(name, extension)));

        let file = self
            .update(&file.id, data)
            .await
            .map_err(|e| e.into_mutation_failure("rename"))?;

        info!(file_id = %file.id, name = %file.name, "File renamed");
        Ok(file)
    }

    async fn write_users(&self, file: &FileRecord, emails: &[String]) -> AppResult<FileRecord> {
        let users = dedup_emails(emails);
        let mut data = Map::new();
        data.insert("users".to_string(), json!(users));

        let file = self
            .update(&file.id, data)
            .await
            .map_err(|e| e.into_mutation_failure("share"))?;

        info!(file_id = %file.id, readers = file.users.len(), "Reader list updated");
        Ok(file)
    }

    async fn remove(&self, file: &FileRecord, blob_id: &str) -> AppResult<()> {
        let file_id = file.id.as_str();
        if file.blob_id != blob_id {
            return Err(AppError::validation(format!(
                "Blob {blob_id} does not belong to file {file_id}"
            )));
        }

        // Step 1: Record
        self.admin
            .databases()
            .delete_document(&self.database_id, &self.files_collection_id, file_id)
            .await
            .map_err(|e| e.into_mutation_failure("delete"))?;

        // Step 2: Blob
        if let Err(e) = self
            .admin
            .storage()
            .delete_file(&self.bucket_id, blob_id)
            .await
        {
            error!(
                file_id = %file_id,
                blob_id = %blob_id,
                error = %e,
                "Blob removal failed after record removal; blob orphaned"
            );
            return Err(e.into_mutation_failure("delete"));
        }

        info!(file_id = %file_id, blob_id = %blob_id, "File deleted");
        Ok(())
    }

    async fn update(&self, file_id: &str, data: Map<String, Value>) -> AppResult<FileRecord> {
        let document = self
            .admin
            .databases()
            .update_document(&self.database_id, &self.files_collection_id, file_id, data)
            .await?;
        Ok(document.parse()?)
    }
}

#[async_trait]
impl FileMutator for FileActions {
    async fn rename(&self, file_id: &str, name: &str, extension: &str) -> AppResult<FileRecord> {
        self.rename_file(file_id, name, extension).await
    }

    async fn set_readers(&self, file_id: &str, emails: &[String]) -> AppResult<FileRecord> {
        self.update_file_users(file_id, emails).await
    }

    async fn delete(&self, file_id: &str, blob_id: &str) -> AppResult<()> {
        self.delete_file(file_id, blob_id).await
    }
}

/// [`FileActions`] bound to one owned file; writes without reloading it.
#[derive(Debug, Clone, Copy)]
pub struct FileScope<'a> {
    actions: &'a FileActions,
    file: &'a OwnedFile,
}

impl<'a> FileScope<'a> {
    fn target(&self, file_id: &str) -> AppResult<&'a FileRecord> {
        let file: &'a FileRecord = self.file;
        if file.id != file_id {
            return Err(AppError::validation(format!(
                "File {file_id} is outside the scope of file {}",
                file.id
            )));
        }
        Ok(file)
    }
}

#[async_trait]
impl<'a> FileMutator for FileScope<'a> {
    async fn rename(&self, file_id: &str, name: &str, extension: &str) -> AppResult<FileRecord> {
        let name = checked_name(name)?;
        let file = self.target(file_id)?;
        self.actions.write_name(file, name, extension).await
    }

    async fn set_readers(&self, file_id: &str, emails: &[String]) -> AppResult<FileRecord> {
        let file = self.target(file_id)?;
        self.actions.write_users(file, emails).await
    }

    async fn delete(&self, file_id: &str, blob_id: &str) -> AppResult<()> {
        let file = self.target(file_id)?;
        self.actions.remove(file, blob_id).await
    }
}

fn checked_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("File name cannot be empty"));
    }
    Ok(name)
}

fn dedup_emails(emails: &[String]) -> Vec<String> {
    let mut users: Vec<String> = Vec::with_capacity(emails.len());
    for email in emails.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        if !users.iter().any(|u| u == email) {
            users.push(email.to_string());
        }
    }
    users
}
