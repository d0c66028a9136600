use thiserror::Error;

use crate::domain::identifier::IdError;

/// Error for tag name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagNameError {
    #[error("Name is required")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all tag-related operations
#[derive(Debug, Clone, Error)]
pub enum TagError {
    #[error("Invalid tag ID: {0}")]
    InvalidTagId(#[from] IdError),

    #[error("Invalid tag name: {0}")]
    InvalidName(#[from] TagNameError),

    #[error("Tag not found: {0}")]
    NotFound(String),

    #[error("Tag slug already exists: {0}")]
    SlugAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
