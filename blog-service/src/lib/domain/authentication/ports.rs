use async_trait::async_trait;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::Authentication;
use crate::domain::authentication::models::AuthenticationId;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::TokenPair;
use crate::domain::principal::Principal;

/// Port for session operations: login, refresh, logout and access token
/// verification.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and open a new session.
    ///
    /// Any refresh token issued by an earlier login stops working.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// * `InvalidToken` - Token fails verification or its session was revoked
    async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError>;

    /// Revoke the caller's session.
    ///
    /// # Errors
    /// * `NotFound` - The principal's authentication record no longer exists
    async fn logout(&self, principal: &Principal) -> Result<(), AuthError>;

    /// Resolve a bearer access token into the acting principal.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is expired, malformed or not ours
    fn authenticate(&self, access_token: &str) -> Result<Principal, AuthError>;
}

/// Persistence operations for authentication records.
///
/// Records are created together with their user; see `UserRepository::create`.
#[async_trait]
pub trait AuthenticationRepository: Send + Sync + 'static {
    async fn find_by_email(&self, email: &str) -> Result<Option<Authentication>, AuthError>;

    async fn find_by_id(
        &self,
        id: &AuthenticationId,
    ) -> Result<Option<Authentication>, AuthError>;

    async fn find_by_refresh_token_id(
        &self,
        refresh_token_id: &str,
    ) -> Result<Option<Authentication>, AuthError>;

    /// Store or clear the refresh-token handle. Only the session columns are
    /// written, so a concurrent password change is never overwritten.
    ///
    /// # Errors
    /// * `NotFound` - Record does not exist
    async fn set_refresh_token_id(
        &self,
        id: &AuthenticationId,
        refresh_token_id: Option<String>,
    ) -> Result<(), AuthError>;
}
