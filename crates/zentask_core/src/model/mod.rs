//! Domain model for projects, tasks and user accounts.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and the wire.
//! - Own field-level validation for create/update payloads.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Deletion is a hard delete; there are no tombstones.
//! - Timestamps are UTC with millisecond precision.

pub mod project;
pub mod task;
pub mod time;
pub mod user;

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Field-level validation failure raised before any persistence call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank. Carries the caller-facing message.
    MissingField(&'static str),
    /// A reference field does not hold a UUID.
    InvalidIdentifier { field: &'static str, value: String },
    /// A date/time value could not be parsed.
    InvalidTimestamp { field: &'static str, value: String },
    /// A value outside a closed enumeration.
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(message) => write!(f, "{message}"),
            Self::InvalidIdentifier { field, value } => {
                write!(f, "invalid {field}: `{value}` is not a valid id")
            }
            Self::InvalidTimestamp { field, value } => write!(
                f,
                "invalid {field}: `{value}`; expected RFC 3339 timestamp or YYYY-MM-DD"
            ),
            Self::InvalidChoice {
                field,
                value,
                expected,
            } => write!(f, "invalid {field}: `{value}`; expected {expected}"),
        }
    }
}

impl Error for ValidationError {}

/// Parses a required reference id, mapping blank input to `missing`.
pub(crate) fn parse_reference(
    value: Option<&str>,
    field: &'static str,
    missing: &'static str,
) -> Result<Uuid, ValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(missing));
    }
    Uuid::parse_str(trimmed).map_err(|_| ValidationError::InvalidIdentifier {
        field,
        value: trimmed.to_string(),
    })
}

/// Trims a text field and returns `None` when nothing is left.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}
