//! Session cookie configuration.

use serde::{Deserialize, Serialize};

/// Session cookie and redirect configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the HTTP-only cookie carrying the session secret.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Where sign-out sends the user.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    /// Avatar reference stored on newly created profile documents.
    #[serde(default = "default_avatar_placeholder")]
    pub avatar_placeholder: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            sign_in_path: default_sign_in_path(),
            avatar_placeholder: default_avatar_placeholder(),
        }
    }
}

fn default_cookie_name() -> String {
    "appwrite-session".to_string()
}

fn default_sign_in_path() -> String {
    "/sign-in".to_string()
}

fn default_avatar_placeholder() -> String {
    "/assets/icons/avatar-placeholder.svg".to_string()
}
