pub mod article;
pub mod authentication;
pub mod category;
pub mod demo;
pub mod tag;
pub mod user;

pub use article::PostgresArticleRepository;
pub use authentication::PostgresAuthenticationRepository;
pub use category::PostgresCategoryRepository;
pub use demo::PostgresDemoRepository;
pub use tag::PostgresTagRepository;
pub use user::PostgresUserRepository;

/// `ILIKE` pattern for a free-text search, `None` when there is nothing to
/// search for.
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
}

/// Name of the violated unique constraint, if that is what failed.
pub(crate) fn unique_violation(error: &sqlx::Error) -> Option<&str> {
    error
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .and_then(|db_err| db_err.constraint())
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
