//! Input validation for mood submissions and chat text.

use std::fmt;

use triage_core::{truncate_chars, MAX_MOOD_VALUE, MIN_MOOD_VALUE};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Mood rating outside the accepted scale.
    MoodOutOfRange(i64),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MoodOutOfRange(value) => write!(
                f,
                "mood value {} is outside {}..={}",
                value, MIN_MOOD_VALUE, MAX_MOOD_VALUE
            ),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum stored length for mood-journal and chat text.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Maximum length for a user identifier.
pub const MAX_USER_ID_LENGTH: usize = 128;

/// Validate a mood rating and narrow it to the stored type.
pub fn validate_mood_value(value: i64) -> Result<u8, ValidationError> {
    match u8::try_from(value) {
        Ok(v) if (MIN_MOOD_VALUE..=MAX_MOOD_VALUE).contains(&v) => Ok(v),
        _ => Err(ValidationError::MoodOutOfRange(value)),
    }
}

/// Validate a user identifier.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ValidationError::Empty("user id".to_string()));
    }
    check_length("user id", user_id, MAX_USER_ID_LENGTH)
}

/// Validate free text. Blank text is rejected only when `required`.
///
/// Length is never an error; see [`bound_text`].
pub fn validate_text(field: &str, text: Option<&str>, required: bool) -> Result<(), ValidationError> {
    match text.map(str::trim) {
        None | Some("") if required => Err(ValidationError::Empty(field.to_string())),
        _ => Ok(()),
    }
}

/// The prefix of `text` that is persisted, at most [`MAX_TEXT_LENGTH`] chars.
pub fn bound_text(text: &str) -> &str {
    truncate_chars(text, MAX_TEXT_LENGTH)
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}
