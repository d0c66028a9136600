use thiserror::Error;

/// Error type for JWT operations.
///
/// Verification failures are split by cause so callers can report a precise
/// reason without inspecting library error strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Unexpected signing method")]
    InvalidSigningMethod,

    #[error("Token issuer is invalid")]
    InvalidIssuer,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}
