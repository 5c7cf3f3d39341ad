//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Numeric field holds something that isn't a number
    NotANumber { field: String, value: String },

    /// Field given more than once where only one is accepted
    Duplicate { field: &'static str },

    /// Request body could not be read in the expected format
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::NotANumber { field, value } => {
                write!(f, "{} must be a number, got '{}'", field, value)
            }
            Self::Duplicate { field } => write!(f, "only one '{}' part is accepted", field),
            Self::Malformed { reason } => write!(f, "malformed request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
