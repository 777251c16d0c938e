//! Unified application error types for StoreIt.
//!
//! Every crate maps its failures into [`AppError`] so that the `?` operator
//! works across the gateway, session and file-action layers. The kind
//! decides both the HTTP status and the short message shown to the user.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Sign-in with a wrong email/password combination.
    InvalidCredentials,
    /// Sign-up with an email that already has an account.
    AccountExists,
    /// No session cookie, or the backend no longer accepts the session.
    NoSession,
    /// A rename, share or delete call was rejected.
    MutationFailed,
    /// Any other backend failure surfaced to the user generically.
    Unknown,
    /// Input validation failed.
    Validation,
    /// The requested document or blob was not found.
    NotFound,
    /// The caller is authenticated but may not act on the resource.
    Forbidden,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The backend answered with an error this system does not classify.
    Backend,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountExists => "ACCOUNT_EXISTS",
            Self::NoSession => "NO_SESSION",
            Self::MutationFailed => "MUTATION_FAILED",
            Self::Unknown => "UNKNOWN",
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Backend => "BACKEND",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout StoreIt.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message (may carry backend detail).
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create an account-exists error.
    pub fn account_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountExists, message)
    }

    /// Create a no-session error.
    pub fn no_session(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoSession, message)
    }

    /// Create a mutation-failed error.
    pub fn mutation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MutationFailed, message)
    }

    /// Create an unknown error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Short message suitable for display next to the triggering control.
    ///
    /// Never leaks backend detail; that stays in `message` for the logs.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::InvalidCredentials => "Invalid email or password.".to_string(),
            ErrorKind::AccountExists => "An account with this email already exists.".to_string(),
            ErrorKind::NoSession => "You are not signed in.".to_string(),
            ErrorKind::MutationFailed => "The action could not be completed.".to_string(),
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::NotFound => "The requested item was not found.".to_string(),
            ErrorKind::Forbidden => "You do not have access to this item.".to_string(),
            ErrorKind::Unknown
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Backend
            | ErrorKind::Internal => "An unknown error occurred.".to_string(),
        }
    }

    /// Re-labels any failure that is not already a session problem as a
    /// failed mutation, keeping the original detail in the message.
    pub fn into_mutation_failure(self, action: &str) -> Self {
        match self.kind {
            ErrorKind::NoSession | ErrorKind::MutationFailed => self,
            _ => Self {
                kind: ErrorKind::MutationFailed,
                message: format!("{action} failed: {}", self.message),
                source: self.source,
            },
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
