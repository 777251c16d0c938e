//! Backend session model.

use serde::{Deserialize, Serialize};

/// A server-issued session authorizing a client to act as one account.
///
/// The `secret` is what ends up in the HTTP-only cookie. It is never
/// serialized back out and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    #[serde(rename = "$id")]
    pub id: String,
    /// Owning account.
    #[serde(rename = "userId")]
    pub account_id: String,
    /// Opaque session token.
    #[serde(default, skip_serializing)]
    pub secret: String,
    /// Expiry as reported by the backend; the policy is the backend's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("account_id", &self.account_id)
            .field("secret", &"<redacted>")
            .field("expire", &self.expire)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_not_serialized_or_debugged() {
        let session: Session = serde_json::from_str(
            r#"{"$id":"s1","userId":"a1","secret":"top-secret","expire":"2030-01-01T00:00:00.000+00:00"}"#,
        )
        .unwrap();
        assert_eq!(session.secret, "top-secret");

        let out = serde_json::to_string(&session).unwrap();
        assert!(!out.contains("top-secret"));
        assert!(!format!("{session:?}").contains("top-secret"));
    }
}
