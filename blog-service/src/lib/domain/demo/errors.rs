use thiserror::Error;

use crate::domain::identifier::IdError;
use crate::domain::user::errors::EmailError;

/// Error for free-text form field validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DemoFieldError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Invalid phone number: {0}")]
    Invalid(String),
}

/// Top-level error for demo request operations
#[derive(Debug, Clone, Error)]
pub enum DemoError {
    #[error("Invalid demo ID: {0}")]
    InvalidDemoId(#[from] IdError),

    #[error("Invalid field: {0}")]
    InvalidField(#[from] DemoFieldError),

    #[error("Invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Demo request not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
