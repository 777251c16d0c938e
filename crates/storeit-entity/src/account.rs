//! Backend account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered identity in the external identity provider.
///
/// Created once via sign-up and never mutated by this system afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Backend-assigned identifier.
    #[serde(rename = "$id")]
    pub id: String,
    /// Unique email address.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Creation timestamp reported by the backend.
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
