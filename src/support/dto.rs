use serde::{Deserialize, Serialize};

use crate::{auth::services::is_valid_email, error::AppError};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 120;
pub const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct SupportMessageRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SupportMessageResponse {
    pub message: &'static str,
}

/// Trimmed, checked copy of a support request.
#[derive(Debug, PartialEq)]
pub struct ValidatedMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn bounded(value: &str, field: &str, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

impl SupportMessageRequest {
    pub fn validate(&self) -> Result<ValidatedMessage, AppError> {
        let name = bounded(&self.name, "Name", MAX_NAME_LEN)?;
        let email = bounded(&self.email, "Email", MAX_EMAIL_LEN)?;
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email address"));
        }
        let message = bounded(&self.message, "Message", MAX_MESSAGE_LEN)?;
        Ok(ValidatedMessage {
            name,
            email,
            message,
        })
    }
}
