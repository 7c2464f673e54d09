//! Name validation rules shared by the engines and the request DTOs.
//!
//! The functions have the signature `validator` expects for
//! `#[validate(custom(function = "..."))]`; engines run them through
//! [`ensure`] to get an [`AppError`].

use std::borrow::Cow;

use validator::ValidationError;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;

/// Longest folder or file name accepted.
pub const MAX_NAME_LENGTH: usize = 255;

const MIN_BUCKET_NAME_LENGTH: usize = 3;
const MAX_BUCKET_NAME_LENGTH: usize = 63;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Folder names: letters, digits, `-`, `_` and whitespace, 1..=255 chars.
pub fn validate_folder_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("folder_name_empty", "Folder name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(
            "folder_name_length",
            "Folder name must be at most 255 characters",
        ));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c.is_whitespace();
    if !name.chars().all(allowed) {
        return Err(invalid(
            "folder_name_chars",
            "Folder name may only contain letters, digits, spaces, '-' and '_'",
        ));
    }
    Ok(())
}

/// File names: 1..=255 chars. Invalid characters are sanitized, not rejected.
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(invalid("file_name_empty", "File name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(
            "file_name_length",
            "File name must be at most 255 characters",
        ));
    }
    Ok(())
}

/// Bucket names follow object-store naming rules: 3..=63 chars of lowercase
/// letters, digits and `-`, starting and ending with a letter or digit.
pub fn validate_bucket_name(name: &str) -> Result<(), ValidationError> {
    if !(MIN_BUCKET_NAME_LENGTH..=MAX_BUCKET_NAME_LENGTH).contains(&name.len()) {
        return Err(invalid(
            "bucket_name_length",
            "Bucket name must be between 3 and 63 characters",
        ));
    }
    let edge = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let starts_ok = name.chars().next().is_some_and(edge);
    let ends_ok = name.chars().last().is_some_and(edge);
    let body_ok = name.chars().all(|c| edge(c) || c == '-');
    if !(starts_ok && ends_ok && body_ok) {
        return Err(invalid(
            "bucket_name_chars",
            "Bucket name may only contain lowercase letters, digits and '-', and must start and end with a letter or digit",
        ));
    }
    Ok(())
}

/// Convert a rule outcome into the engine error type.
pub fn ensure(result: Result<(), ValidationError>) -> AppResult<()> {
    result.map_err(|e| {
        let message = e
            .message
            .map(|m| m.into_owned())
            .unwrap_or_else(|| e.code.into_owned());
        AppError::validation(message)
    })
}
