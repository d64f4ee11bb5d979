use tracing::{debug, info};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::error::QuizError;

/// Width of the name columns.
pub const MAX_NAME_LEN: usize = 255;

/// Runs the derived validators and flattens the errors into one message.
pub fn validate_request<T: Validate>(value: &T) -> Result<(), QuizError> {
    match value.validate() {
        Ok(_) => {
            debug!("Validation passed");
            Ok(())
        }
        Err(e) => {
            let error_msg = format_validation_errors(&e);
            info!("Validation error: {}", error_msg);
            Err(QuizError::Validation(error_msg))
        }
    }
}

/// Format validation errors into a user-friendly message
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let msg = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} validation failed", field));
            messages.push(msg);
        }
    }

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.sort();
        messages.join(", ")
    }
}

/// Room names: non-empty after trimming, at most 255 chars.
pub fn validate_room_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::new("room_name_empty")
            .with_message("Room name is required".into()));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new("room_name_too_long")
            .with_message("Room name must be at most 255 characters".into()));
    }

    Ok(())
}

pub fn validate_participant_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::new("name_empty").with_message("Name is required".into()));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new("name_too_long")
            .with_message("Name must be at most 255 characters".into()));
    }

    Ok(())
}

/// Same checks as [`validate_participant_name`], as a crate error.
pub fn participant_name(name: &str) -> Result<&str, QuizError> {
    validate_participant_name(name).map_err(|e| {
        QuizError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Name is required".to_string()),
        )
    })?;

    Ok(name.trim())
}

/// Ids arrive from the client as strings.
pub fn parse_id(label: &str, raw: &str) -> Result<Uuid, QuizError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(QuizError::validation(format!("Missing {} id", label)));
    }

    Uuid::parse_str(raw).map_err(|_| QuizError::validation(format!("Invalid {} id", label)))
}
