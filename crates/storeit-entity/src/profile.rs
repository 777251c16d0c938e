//! Profile documents mirrored into the users collection.

use serde::{Deserialize, Serialize};

/// This system's own record mirroring account metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Document identifier.
    #[serde(rename = "$id")]
    pub id: String,
    /// Foreign key to the backend account (unique).
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// Account email at creation time.
    pub email: String,
    /// Account display name at creation time.
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Avatar reference.
    pub avatar: String,
}

/// Field set written when a profile document is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    /// Foreign key to the backend account.
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// Account email.
    pub email: String,
    /// Account display name.
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Avatar reference.
    pub avatar: String,
}
