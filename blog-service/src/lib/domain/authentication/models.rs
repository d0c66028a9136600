use chrono::DateTime;
use chrono::Utc;

use crate::domain::identifier::uuid_identifier;
use crate::domain::user::models::Roles;
use crate::domain::user::models::UserId;

uuid_identifier!(
    /// Authentication record identifier
    AuthenticationId
);

/// Credentials of a user plus the current refresh-token handle.
///
/// `refresh_token_id` is the only server-side session state: replacing it
/// invalidates outstanding refresh tokens and clearing it revokes them all.
/// `email` and `roles` are read from the owning user.
#[derive(Debug, Clone, PartialEq)]
pub struct Authentication {
    pub id: AuthenticationId,
    pub user_id: UserId,
    pub email: String,
    pub roles: Roles,
    pub password_hash: String,
    pub refresh_token_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<auth::TokenPair> for TokenPair {
    fn from(pair: auth::TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}
