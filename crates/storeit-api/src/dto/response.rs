//! Response DTOs.

use serde::{Deserialize, Serialize};

use storeit_entity::{Account, FileRecord, ProfileDocument, Session};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Account summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
        }
    }
}

/// Session summary. The secret only ever travels in the cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub account_id: String,
    pub expire: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            account_id: session.account_id,
            expire: session.expire,
        }
    }
}

/// Profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub account_id: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
}

impl From<ProfileDocument> for ProfileResponse {
    fn from(profile: ProfileDocument) -> Self {
        Self {
            id: profile.id,
            account_id: profile.account_id,
            email: profile.email,
            full_name: profile.full_name,
            avatar: profile.avatar,
        }
    }
}

/// File record as shown in listings and dialogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: String,
    /// Stored name including the extension.
    pub name: String,
    /// Name without the extension.
    pub display_name: String,
    pub extension: String,
    pub owner_id: String,
    pub users: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl From<FileRecord> for FileResponse {
    fn from(file: FileRecord) -> Self {
        Self {
            display_name: file.display_name().to_string(),
            id: file.id,
            name: file.name,
            extension: file.extension,
            owner_id: file.owner_id,
            users: file.users,
            size: file.size,
        }
    }
}

/// Plain message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
