use thiserror::Error;

use crate::domain::article::models::ArticleStatus;
use crate::domain::identifier::IdError;

/// Error for article title validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("Title too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for article body validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("Content is required")]
    Empty,
}

/// Error for excerpt validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExcerptError {
    #[error("Excerpt too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Unknown article status: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("Unsupported sort field: {0}")]
    UnknownField(String),

    #[error("Unsupported sort order: {0}")]
    UnknownOrder(String),
}

/// Error for source URL validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceUrlError {
    #[error("Invalid URL: {0}")]
    Malformed(String),

    #[error("Only http and https URLs are supported, got {0}")]
    UnsupportedScheme(String),
}

/// Top-level error for all article-related operations
#[derive(Debug, Clone, Error)]
pub enum ArticleError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid article ID: {0}")]
    InvalidArticleId(#[from] IdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("Invalid content: {0}")]
    InvalidContent(#[from] ContentError),

    #[error("Invalid excerpt: {0}")]
    InvalidExcerpt(#[from] ExcerptError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] StatusError),

    #[error("Invalid sort: {0}")]
    InvalidSort(#[from] SortError),

    #[error("Invalid source URL: {0}")]
    InvalidSourceUrl(#[from] SourceUrlError),

    // Domain rule violations
    #[error("Featured position must be 1, 2 or 3, got {0}")]
    InvalidPosition(i64),

    #[error("Cannot change {from} article to {to}")]
    InvalidStatusTransition {
        from: ArticleStatus,
        to: ArticleStatus,
    },

    #[error("A publish date is required to schedule an article")]
    PublishDateRequired,

    #[error("Unknown tags: {0}")]
    UnknownTags(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    // Domain-level errors
    #[error("Article not found: {0}")]
    NotFound(String),

    #[error("Article slug already exists: {0}")]
    SlugAlreadyExists(String),

    #[error("Failed to fetch external article: {0}")]
    FetchFailed(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
