//! Action dialog state machine for one file row.
//!
//! ```text
//! Idle --select--> ActionSelected --start_commit--> Confirming
//!                        ^                              |
//!                        +-------- failure -------------+
//!                                                       |
//! Idle <------------------- success --------------------+
//! ```
//!
//! Download and details never reach `Confirming`.

use tracing::{info, warn};

use storeit_core::config::BackendConfig;
use storeit_core::error::AppError;
use storeit_core::result::AppResult;
use storeit_entity::{ActionKind, FileRecord, MutatingAction};

use crate::file::mutation::{FileMutator, Mutation, MutationOutcome};
use crate::share::reconciler::ShareList;

/// Where the dialog stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Closed.
    Idle,
    /// Read-only information view.
    Details,
    /// Editor open for a mutating action.
    ActionSelected(MutatingAction),
    /// Commit dispatched, waiting for the store.
    Confirming(MutatingAction),
}

/// What selecting an action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A mutating editor opened.
    Editor(MutatingAction),
    /// The details view opened.
    Details,
    /// Fetch the blob from this URL; the dialog stays closed.
    Download(String),
    /// A commit is outstanding; nothing changed.
    Busy,
}

/// Transient editing state of one file's action dialog.
#[derive(Debug, Clone)]
pub struct FileActionDialog {
    file: FileRecord,
    state: DialogState,
    name: String,
    emails: ShareList,
    loading: bool,
}

impl FileActionDialog {
    /// A closed dialog for `file`.
    pub fn new(file: FileRecord) -> Self {
        let name = file.base_name().to_string();
        Self {
            file,
            state: DialogState::Idle,
            name,
            emails: ShareList::default(),
            loading: false,
        }
    }

    pub fn file(&self) -> &FileRecord {
        &self.file
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Whether a dialog is showing.
    pub fn is_open(&self) -> bool {
        self.state != DialogState::Idle
    }

    /// Whether a commit is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The edited base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reader-list editor.
    pub fn emails(&self) -> &ShareList {
        &self.emails
    }

    /// Prompt shown by the delete editor.
    pub fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete {}?", self.file.name)
    }

    /// Picks an action from the menu, resetting any earlier edits.
    pub fn select(&mut self, kind: ActionKind, config: &BackendConfig) -> Selection {
        if self.loading {
            return Selection::Busy;
        }
        self.reset();

        match kind.mutating() {
            Some(action) => {
                if action == MutatingAction::Share {
                    self.emails = ShareList::new(self.file.users.clone());
                }
                self.state = DialogState::ActionSelected(action);
                Selection::Editor(action)
            }
            None => match kind {
                ActionKind::Details => {
                    self.state = DialogState::Details;
                    Selection::Details
                }
                _ => Selection::Download(config.download_url(&self.file.blob_id)),
            },
        }
    }

    /// Replaces the edited name. Ignored unless the rename editor is open.
    pub fn set_name(&mut self, name: &str) {
        if self.state == DialogState::ActionSelected(MutatingAction::Rename) {
            self.name = name.to_string();
        }
    }

    /// Buffers comma-separated additions. Ignored unless the share editor is open.
    pub fn add_emails(&mut self, input: &str) {
        if self.state == DialogState::ActionSelected(MutatingAction::Share) {
            self.emails.add_input(input);
        }
    }

    /// Revokes one reader immediately, keeping the share editor open.
    pub async fn remove_email(
        &mut self,
        email: &str,
        mutator: &dyn FileMutator,
    ) -> AppResult<()> {
        if self.state != DialogState::ActionSelected(MutatingAction::Share) {
            return Err(AppError::validation("The share editor is not open"));
        }
        let record = self.emails.remove_email(&self.file.id, email, mutator).await?;
        self.file = record;
        Ok(())
    }

    /// Closes the dialog. Refused while a commit is outstanding.
    pub fn cancel(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.reset();
        true
    }

    /// Moves to `Confirming` and returns the one mutation to dispatch.
    ///
    /// Fails without changing state when no editor is open, when a commit
    /// is already outstanding, or when the edited name is blank.
    pub fn start_commit(&mut self) -> AppResult<Mutation> {
        if self.loading {
            return Err(AppError::validation("A commit is already in progress"));
        }
        let DialogState::ActionSelected(action) = self.state else {
            return Err(AppError::validation("No action is awaiting confirmation"));
        };

        let file_id = self.file.id.clone();
        let mutation = match action {
            MutatingAction::Rename => {
                let name = self.name.trim();
                if name.is_empty() {
                    return Err(AppError::validation("File name cannot be empty"));
                }
                Mutation::Rename {
                    file_id,
                    name: name.to_string(),
                    extension: self.file.extension.clone(),
                }
            }
            MutatingAction::Share => Mutation::Share {
                file_id,
                emails: self.emails.target(),
            },
            MutatingAction::Delete => Mutation::Delete {
                file_id,
                blob_id: self.file.blob_id.clone(),
            },
        };

        self.loading = true;
        self.state = DialogState::Confirming(action);
        Ok(mutation)
    }

    /// Applies the store's answer to an outstanding commit.
    ///
    /// Success closes the dialog and resets every edit. Failure clears the
    /// loading flag and reopens the editor with the edits intact.
    pub fn complete_commit(
        &mut self,
        result: AppResult<MutationOutcome>,
    ) -> AppResult<MutationOutcome> {
        let DialogState::Confirming(action) = self.state else {
            return result;
        };

        match result {
            Ok(outcome) => {
                if let MutationOutcome::Updated(record) = &outcome {
                    self.file = record.clone();
                }
                info!(file_id = %self.file.id, action = %action, "File action committed");
                self.reset();
                Ok(outcome)
            }
            Err(e) => {
                warn!(file_id = %self.file.id, action = %action, error = %e, "File action failed");
                self.loading = false;
                self.state = DialogState::ActionSelected(action);
                Err(e)
            }
        }
    }

    /// Runs a full commit: start, dispatch, complete.
    pub async fn commit(&mut self, mutator: &dyn FileMutator) -> AppResult<MutationOutcome> {
        let mutation = self.start_commit()?;
        let result = mutation.apply(mutator).await;
        self.complete_commit(result)
    }

    fn reset(&mut self) {
        self.state = DialogState::Idle;
        self.name = self.file.base_name().to_string();
        self.emails.clear();
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, StubMutator, sample_file};

    fn config() -> BackendConfig {
        BackendConfig {
            endpoint: "https://backend.test/v1".to_string(),
            project_id: "proj".to_string(),
            database_id: "db".to_string(),
            users_collection_id: "users".to_string(),
            files_collection_id: "files".to_string(),
            bucket_id: "bucket".to_string(),
            api_key: String::new(),
            request_timeout_seconds: 5,
        }
    }

    fn opened(kind: ActionKind) -> FileActionDialog {
        let mut dialog = FileActionDialog::new(sample_file());
        dialog.select(kind, &config());
        dialog
    }

    fn assert_reset(dialog: &FileActionDialog) {
        assert_eq!(dialog.state(), DialogState::Idle);
        assert!(!dialog.is_open());
        assert!(!dialog.is_loading());
        assert_eq!(dialog.name(), dialog.file().base_name());
        assert!(dialog.emails().readers().is_empty());
        assert!(dialog.emails().pending().is_empty());
    }

    #[test]
    fn test_open_rename_prefills_base_name() {
        let dialog = opened(ActionKind::Rename);
        assert_eq!(
            dialog.state(),
            DialogState::ActionSelected(MutatingAction::Rename)
        );
        assert_eq!(dialog.name(), "draft");
    }

    #[test]
    fn test_download_and_details_never_confirm() {
        let mut dialog = FileActionDialog::new(sample_file());

        let selection = dialog.select(ActionKind::Download, &config());
        assert_eq!(
            selection,
            Selection::Download(
                "https://backend.test/v1/storage/buckets/bucket/files/b1/download?project=proj"
                    .to_string()
            )
        );
        assert_eq!(dialog.state(), DialogState::Idle);
        assert!(dialog.start_commit().is_err());

        assert_eq!(dialog.select(ActionKind::Details, &config()), Selection::Details);
        assert_eq!(dialog.state(), DialogState::Details);
        assert!(dialog.start_commit().is_err());
        assert_eq!(dialog.state(), DialogState::Details);
    }

    #[tokio::test]
    async fn test_rename_success_resets_to_idle() {
        let stub = StubMutator::new(sample_file());
        let mut dialog = opened(ActionKind::Rename);
        dialog.set_name("report");

        let outcome = dialog.commit(&stub).await.unwrap();

        let MutationOutcome::Updated(record) = outcome else {
            panic!("rename returns the record");
        };
        assert_eq!(record.display_name(), "report");
        assert_eq!(record.extension, "pdf");
        assert_eq!(
            stub.calls(),
            vec![Call::Rename {
                file_id: "f1".to_string(),
                name: "report".to_string(),
                extension: "pdf".to_string(),
            }]
        );
        assert_reset(&dialog);
        assert_eq!(dialog.name(), "report");
    }

    #[tokio::test]
    async fn test_share_success_resets_to_idle() {
        let stub = StubMutator::new(sample_file());
        let mut dialog = opened(ActionKind::Share);
        dialog.add_emails("d@x.com");

        dialog.commit(&stub).await.unwrap();

        assert_eq!(
            stub.calls(),
            vec![Call::SetReaders {
                file_id: "f1".to_string(),
                emails: vec![
                    "a@x.com".to_string(),
                    "b@x.com".to_string(),
                    "c@x.com".to_string(),
                    "d@x.com".to_string(),
                ],
            }]
        );
        assert_eq!(dialog.file().users.len(), 4);
        assert_reset(&dialog);
    }

    #[tokio::test]
    async fn test_delete_success_resets_to_idle() {
        let stub = StubMutator::new(sample_file());
        let mut dialog = opened(ActionKind::Delete);
        assert_eq!(dialog.delete_prompt(), "Are you sure you want to delete draft.pdf?");

        let outcome = dialog.commit(&stub).await.unwrap();

        assert_eq!(outcome, MutationOutcome::Deleted);
        assert_reset(&dialog);
    }

    #[tokio::test]
    async fn test_failure_keeps_edits_and_clears_loading() {
        let stub = StubMutator::failing(sample_file());

        let mut rename = opened(ActionKind::Rename);
        rename.set_name("report");
        assert!(rename.commit(&stub).await.is_err());
        assert_eq!(
            rename.state(),
            DialogState::ActionSelected(MutatingAction::Rename)
        );
        assert!(!rename.is_loading());
        assert_eq!(rename.name(), "report");
        assert_eq!(rename.file().name, "draft.pdf");

        let mut share = opened(ActionKind::Share);
        share.add_emails("d@x.com");
        assert!(share.commit(&stub).await.is_err());
        assert_eq!(
            share.state(),
            DialogState::ActionSelected(MutatingAction::Share)
        );
        assert!(!share.is_loading());
        assert_eq!(share.emails().pending(), ["d@x.com".to_string()]);

        let mut delete = opened(ActionKind::Delete);
        assert!(delete.commit(&stub).await.is_err());
        assert_eq!(
            delete.state(),
            DialogState::ActionSelected(MutatingAction::Delete)
        );
        assert!(!delete.is_loading());
    }

    #[test]
    fn test_loading_blocks_reentrant_commit() {
        let mut dialog = opened(ActionKind::Delete);

        let mutation = dialog.start_commit().unwrap();
        assert_eq!(mutation.action(), MutatingAction::Delete);
        assert!(dialog.is_loading());
        assert_eq!(
            dialog.state(),
            DialogState::Confirming(MutatingAction::Delete)
        );

        assert!(dialog.start_commit().is_err());
        assert_eq!(dialog.select(ActionKind::Rename, &config()), Selection::Busy);
        assert!(!dialog.cancel());

        dialog
            .complete_commit(Err(AppError::mutation_failed("boom")))
            .unwrap_err();
        assert!(!dialog.is_loading());
        assert!(dialog.cancel());
        assert_reset(&dialog);
    }

    #[test]
    fn test_blank_name_is_not_dispatched() {
        let mut dialog = opened(ActionKind::Rename);
        dialog.set_name("   ");

        let err = dialog.start_commit().unwrap_err();
        assert_eq!(err.kind, storeit_core::ErrorKind::Validation);
        assert!(!dialog.is_loading());
        assert_eq!(
            dialog.state(),
            DialogState::ActionSelected(MutatingAction::Rename)
        );
    }

    #[tokio::test]
    async fn test_remove_email_updates_file_and_stays_open() {
        let stub = StubMutator::new(sample_file());
        let mut dialog = opened(ActionKind::Share);

        dialog.remove_email("b@x.com", &stub).await.unwrap();

        assert_eq!(
            dialog.file().users,
            vec!["a@x.com".to_string(), "c@x.com".to_string()]
        );
        assert_eq!(
            dialog.state(),
            DialogState::ActionSelected(MutatingAction::Share)
        );
    }

    #[test]
    fn test_reopen_resets_previous_edits() {
        let mut dialog = opened(ActionKind::Rename);
        dialog.set_name("half typed");
        dialog.select(ActionKind::Rename, &config());
        assert_eq!(dialog.name(), "draft");
    }
}
