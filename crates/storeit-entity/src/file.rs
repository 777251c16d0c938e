//! File records stored in the files collection.

use serde::{Deserialize, Serialize};

/// Metadata row describing one stored file.
///
/// The stored `name` carries the extension (`report.pdf`); the base name
/// shown and edited in the UI is derived from it, and the extension is kept
/// in its own attribute so rename can never alter it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Document identifier.
    #[serde(rename = "$id")]
    pub id: String,
    /// Stored file name including the extension.
    pub name: String,
    /// Extension without the leading dot; may be empty.
    #[serde(default)]
    pub extension: String,
    /// Identifier of the blob in the object store.
    #[serde(rename = "bucketFileID")]
    pub blob_id: String,
    /// Account id of the owner.
    #[serde(rename = "accountId")]
    pub owner_id: String,
    /// Emails granted read access.
    #[serde(default)]
    pub users: Vec<String>,
    /// Coarse file type (document, image, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FileRecord {
    /// Name without the trailing `.{extension}`.
    pub fn base_name(&self) -> &str {
        strip_extension(&self.name, &self.extension)
    }

    /// Name shown in listings and dialogs.
    pub fn display_name(&self) -> &str {
        self.base_name()
    }

    /// Stored name for a new base name with this record's extension.
    pub fn renamed(&self, base_name: &str) -> String {
        join_name(base_name, &self.extension)
    }
}

/// Joins a base name and an extension into a stored file name.
pub fn join_name(base_name: &str, extension: &str) -> String {
    if extension.is_empty() {
        base_name.to_string()
    } else {
        format!("{base_name}.{extension}")
    }
}

fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    if extension.is_empty() {
        return name;
    }
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|base| !base.is_empty())
        .unwrap_or(name)
}
