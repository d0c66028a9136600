use thiserror::Error;

/// Top-level error for login, refresh and logout.
///
/// Credential failures share one message so callers cannot tell an unknown
/// email from a wrong password.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Password wrong or Email not found")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Authentication record not found: {0}")]
    NotFound(String),

    #[error("Password error: {0}")]
    Password(String),

    #[error("Token error: {0}")]
    Token(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => AuthError::Password(e.to_string()),
            auth::AuthenticationError::JwtError(e) => AuthError::Token(e.to_string()),
        }
    }
}
