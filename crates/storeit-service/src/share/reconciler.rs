//! Share-list editing with two commit paths.
//!
//! Additions are buffered locally and only reach the store when the share
//! dialog is confirmed. Removals revoke access immediately: the reduced
//! list is written first and the local list is replaced only once the
//! store has accepted it.

use tracing::{info, warn};

use storeit_core::result::AppResult;
use storeit_entity::FileRecord;

use crate::file::mutation::FileMutator;

/// Appends `email` to `list`. Duplicates are kept.
pub fn with_email(list: &[String], email: &str) -> Vec<String> {
    let mut next = list.to_vec();
    next.push(email.to_string());
    next
}

/// `list` without any entry exactly equal to `email`, order preserved.
pub fn without_email(list: &[String], email: &str) -> Vec<String> {
    list.iter().filter(|e| e.as_str() != email).cloned().collect()
}

/// Splits comma-separated input into trimmed, non-empty emails.
pub fn parse_email_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reader list of one file plus the additions not yet committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareList {
    /// Readers as last committed to the store.
    readers: Vec<String>,
    /// Additions awaiting the share confirmation.
    pending: Vec<String>,
}

impl ShareList {
    /// Starts editing from the file's committed readers.
    pub fn new(readers: Vec<String>) -> Self {
        Self {
            readers,
            pending: Vec::new(),
        }
    }

    /// Committed readers.
    pub fn readers(&self) -> &[String] {
        &self.readers
    }

    /// Buffered additions.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Buffers an addition. No duplicate check.
    pub fn add_email(&mut self, email: &str) {
        self.pending = with_email(&self.pending, email);
    }

    /// Buffers every email in a comma-separated input.
    pub fn add_input(&mut self, input: &str) {
        for email in parse_email_input(input) {
            self.add_email(&email);
        }
    }

    /// The full list a share confirmation writes: readers, then additions.
    pub fn target(&self) -> Vec<String> {
        self.readers
            .iter()
            .chain(self.pending.iter())
            .cloned()
            .collect()
    }

    /// Revokes `email` from the file right away.
    ///
    /// Writes the committed readers minus `email`. On success the local
    /// readers are replaced with that list and any buffered copy of the
    /// email is dropped; on failure nothing changes and no retry follows.
    pub async fn remove_email(
        &mut self,
        file_id: &str,
        email: &str,
        mutator: &dyn FileMutator,
    ) -> AppResult<FileRecord> {
        let next = without_email(&self.readers, email);

        match mutator.set_readers(file_id, &next).await {
            Ok(record) => {
                info!(file_id = %file_id, email = %email, "Reader removed");
                self.readers = next;
                self.pending = without_email(&self.pending, email);
                Ok(record)
            }
            Err(e) => {
                warn!(file_id = %file_id, email = %email, error = %e, "Reader removal failed");
                Err(e)
            }
        }
    }

    /// Drops all state.
    pub fn clear(&mut self) {
        self.readers.clear();
        self.pending.clear();
    }
}
