//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use storeit_core::error::AppError;

/// Sign-up request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Email.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Full name.
    #[validate(length(min = 3, message = "Full name must be at least 3 characters"))]
    pub full_name: String,
}

/// Sign-in request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    /// Email.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Rename request body. The extension is taken from the stored record.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New base name.
    #[validate(length(min = 1, max = 255, message = "File name is required"))]
    pub name: String,
}

/// Share request body: the complete reader list.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareRequest {
    /// Emails granted read access.
    #[validate(custom(function = "validate_emails"))]
    pub emails: Vec<String>,
}

fn validate_emails(emails: &[String]) -> Result<(), ValidationError> {
    if emails.iter().all(|e| e.validate_email()) {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Every reader must be a valid email".into()))
    }
}

/// Validates `request`, folding field messages into one `Validation` error.
pub fn validate<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    AppError::validation(messages.join("; "))
}
