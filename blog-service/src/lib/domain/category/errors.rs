use thiserror::Error;

use crate::domain::identifier::IdError;

/// Error for category name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryNameError {
    #[error("Name is required")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all category-related operations
#[derive(Debug, Clone, Error)]
pub enum CategoryError {
    #[error("Invalid category ID: {0}")]
    InvalidCategoryId(#[from] IdError),

    #[error("Invalid category name: {0}")]
    InvalidName(#[from] CategoryNameError),

    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Category slug already exists: {0}")]
    SlugAlreadyExists(String),

    #[error("Category is still used by articles: {0}")]
    InUse(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
