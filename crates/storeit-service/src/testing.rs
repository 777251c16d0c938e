//! Recording [`FileMutator`] for state-machine tests.

use std::sync::Mutex;

use async_trait::async_trait;

use storeit_core::error::AppError;
use storeit_core::result::AppResult;
use storeit_entity::FileRecord;
use storeit_entity::file::join_name;

use crate::file::mutation::FileMutator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Rename {
        file_id: String,
        name: String,
        extension: String,
    },
    SetReaders {
        file_id: String,
        emails: Vec<String>,
    },
    Delete {
        file_id: String,
        blob_id: String,
    },
}

/// Applies mutations to an in-memory record, or fails every call.
pub struct StubMutator {
    file: Mutex<FileRecord>,
    calls: Mutex<Vec<Call>>,
    failing: bool,
}

impl StubMutator {
    pub fn new(file: FileRecord) -> Self {
        Self {
            file: Mutex::new(file),
            calls: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    pub fn failing(file: FileRecord) -> Self {
        Self {
            failing: true,
            ..Self::new(file)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err(AppError::mutation_failed("stub failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl FileMutator for StubMutator {
    async fn rename(&self, file_id: &str, name: &str, extension: &str) -> AppResult<FileRecord> {
        self.record(Call::Rename {
            file_id: file_id.to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
        })?;
        let mut file = self.file.lock().unwrap();
        file.name = join_name(name, extension);
        Ok(file.clone())
    }

    async fn set_readers(&self, file_id: &str, emails: &[String]) -> AppResult<FileRecord> {
        self.record(Call::SetReaders {
            file_id: file_id.to_string(),
            emails: emails.to_vec(),
        })?;
        let mut file = self.file.lock().unwrap();
        file.users = emails.to_vec();
        Ok(file.clone())
    }

    async fn delete(&self, file_id: &str, blob_id: &str) -> AppResult<()> {
        self.record(Call::Delete {
            file_id: file_id.to_string(),
            blob_id: blob_id.to_string(),
        })
    }
}

pub fn sample_file() -> FileRecord {
    FileRecord {
        id: "f1".to_string(),
        name: "draft.pdf".to_string(),
        extension: "pdf".to_string(),
        blob_id: "b1".to_string(),
        owner_id: "acc1".to_string(),
        users: vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "c@x.com".to_string(),
        ],
        file_type: Some("document".to_string()),
        size: Some(2048),
    }
}
