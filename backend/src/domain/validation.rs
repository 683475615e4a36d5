//! Field-level validation shared by the entity value types.
//!
//! Inbound payloads arrive as optional raw strings. The helpers here turn
//! them into trimmed values or a [`FieldError`] whose `Display` text is the
//! message reported to clients under the offending field name.

use std::fmt;

/// A single validation failure for one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field was not supplied at all.
    Required,
    /// The field was supplied but empty once trimmed.
    Blank,
    /// The value is shorter than the permitted minimum.
    TooShort { min: usize },
    /// The value is longer than the permitted maximum.
    TooLong { max: usize },
    /// The username contains characters outside the permitted set.
    InvalidUsername,
    /// The value is not a syntactically valid email address.
    InvalidEmail,
    /// The value already belongs to another record.
    NotUnique,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "This field is required."),
            Self::Blank => write!(f, "This field may not be blank."),
            Self::TooShort { min } => {
                write!(f, "Ensure this field has at least {min} characters.")
            }
            Self::TooLong { max } => {
                write!(f, "Ensure this field has no more than {max} characters.")
            }
            Self::InvalidUsername => write!(
                f,
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
            ),
            Self::InvalidEmail => write!(f, "Enter a valid email address."),
            Self::NotUnique => write!(f, "This field must be unique."),
        }
    }
}

impl std::error::Error for FieldError {}

/// Require a value to be present and non-blank, returning it trimmed.
pub fn required_text(raw: Option<&str>) -> Result<String, FieldError> {
    let value = raw.ok_or(FieldError::Required)?.trim();
    if value.is_empty() {
        return Err(FieldError::Blank);
    }
    Ok(value.to_owned())
}

/// Reject values whose character count exceeds `max`.
pub fn at_most(value: String, max: usize) -> Result<String, FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::TooLong { max });
    }
    Ok(value)
}
