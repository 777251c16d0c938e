//! The closed set of file mutations and the trait that executes them.

use async_trait::async_trait;

use storeit_core::result::AppResult;
use storeit_entity::{FileRecord, MutatingAction};

/// Executes file mutations against the document and blob stores.
#[async_trait]
pub trait FileMutator: Send + Sync {
    /// Sets the base name, keeping `extension`.
    async fn rename(&self, file_id: &str, name: &str, extension: &str) -> AppResult<FileRecord>;

    /// Replaces the reader list with `emails`.
    async fn set_readers(&self, file_id: &str, emails: &[String]) -> AppResult<FileRecord>;

    /// Removes the record, then its blob.
    async fn delete(&self, file_id: &str, blob_id: &str) -> AppResult<()>;
}

/// A confirmed mutation, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// New base name plus the file's unchanged extension.
    Rename {
        file_id: String,
        name: String,
        extension: String,
    },
    /// The full target reader list, not a delta.
    Share { file_id: String, emails: Vec<String> },
    /// Record and blob, removed together.
    Delete { file_id: String, blob_id: String },
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The record as stored after the change.
    Updated(FileRecord),
    /// The record is gone.
    Deleted,
}

impl Mutation {
    /// Which action this mutation commits.
    pub fn action(&self) -> MutatingAction {
        match self {
            Self::Rename { .. } => MutatingAction::Rename,
            Self::Share { .. } => MutatingAction::Share,
            Self::Delete { .. } => MutatingAction::Delete,
        }
    }

    /// Target file id.
    pub fn file_id(&self) -> &str {
        match self {
            Self::Rename { file_id, .. } | Self::Share { file_id, .. } | Self::Delete { file_id, .. } => {
                file_id
            }
        }
    }

    /// Dispatches exactly one call on `mutator`.
    pub async fn apply(&self, mutator: &dyn FileMutator) -> AppResult<MutationOutcome> {
        match self {
            Self::Rename {
                file_id,
                name,
                extension,
            } => mutator
                .rename(file_id, name, extension)
                .await
                .map(MutationOutcome::Updated),
            Self::Share { file_id, emails } => mutator
                .set_readers(file_id, emails)
                .await
                .map(MutationOutcome::Updated),
            Self::Delete { file_id, blob_id } => mutator
                .delete(file_id, blob_id)
                .await
                .map(|()| MutationOutcome::Deleted),
        }
    }
}
