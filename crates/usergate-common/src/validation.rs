use regex::Regex;
use thiserror::Error;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// A request field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Canonical form of an email used for lookups and the uniqueness constraint.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN).is_ok_and(|re| re.is_match(email))
}

/// Return the field value if present and not blank. The value is returned
/// as given (passwords keep surrounding whitespace).
pub fn require<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, FieldError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FieldError::Missing(field)),
    }
}

/// Normalize and validate an email in one step.
pub fn parse_email(raw: &str) -> Result<String, FieldError> {
    let email = normalize_email(raw);
    if is_valid_email(&email) {
        Ok(email)
    } else {
        Err(FieldError::InvalidEmail(raw.trim().to_string()))
    }
}
