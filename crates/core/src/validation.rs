//! Entity validation rules.
//!
//! Each validator reports only the first failing rule, as a
//! [`CoreError::Validation`] whose message is returned to clients verbatim.
//! Rules run before any persistence attempt.

use crate::date::NullableDate;
use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of project and task titles, in characters.
pub const MAX_TITLE_LEN: usize = 255;

pub const TITLE_REQUIRED: &str = "title is required";
pub const TITLE_TOO_LONG: &str = "title must not exceed 255 characters";
pub const FINISH_BEFORE_START: &str = "finish date cannot be before start date";
pub const PROJECT_ID_REQUIRED: &str = "valid project_id is required";
pub const EMAIL_REQUIRED: &str = "email is required";
pub const NAME_REQUIRED: &str = "name is required";
pub const EMAIL_INVALID: &str = "invalid email format";

fn invalid(message: &str) -> CoreError {
    CoreError::Validation(message.to_string())
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(invalid(TITLE_REQUIRED));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(invalid(TITLE_TOO_LONG));
    }
    Ok(())
}

/// Equal dates are allowed; either side may be absent.
fn validate_date_order(start: NullableDate, finish: NullableDate) -> Result<(), CoreError> {
    if let (Some(start), Some(finish)) = (start.date(), finish.date()) {
        if finish < start {
            return Err(invalid(FINISH_BEFORE_START));
        }
    }
    Ok(())
}

pub fn validate_user(email: &str, name: &str) -> Result<(), CoreError> {
    if email.trim().is_empty() {
        return Err(invalid(EMAIL_REQUIRED));
    }
    if name.trim().is_empty() {
        return Err(invalid(NAME_REQUIRED));
    }
    if !email.contains('@') {
        return Err(invalid(EMAIL_INVALID));
    }
    Ok(())
}

pub fn validate_project(
    title: &str,
    start_date: NullableDate,
    finish_date: NullableDate,
) -> Result<(), CoreError> {
    validate_title(title)?;
    validate_date_order(start_date, finish_date)
}

pub fn validate_task(
    project_id: DbId,
    title: &str,
    start_date: NullableDate,
    finish_date: NullableDate,
) -> Result<(), CoreError> {
    validate_title(title)?;
    if project_id <= 0 {
        return Err(invalid(PROJECT_ID_REQUIRED));
    }
    validate_date_order(start_date, finish_date)
}
