use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PasswordError {
    #[error("Password exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
