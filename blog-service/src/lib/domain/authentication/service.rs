use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenSubject;
use uuid::Uuid;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::Authentication;
use crate::domain::authentication::models::AuthenticationId;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::TokenPair;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::authentication::ports::AuthenticationRepository;
use crate::domain::principal::Principal;
use crate::domain::user::models::Roles;
use crate::domain::user::models::UserId;

/// Domain service implementation for session operations.
pub struct AuthService<AR>
where
    AR: AuthenticationRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AuthService<AR>
where
    AR: AuthenticationRepository,
{
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn token_subject(authentication: &Authentication) -> TokenSubject {
        TokenSubject {
            auth_id: authentication.id.to_string(),
            user_id: authentication.user_id.to_string(),
            email: authentication.email.clone(),
            roles: authentication.roles.names(),
        }
    }
}

#[async_trait]
impl<AR> AuthServicePort for AuthService<AR>
where
    AR: AuthenticationRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError> {
        let email = command.email.trim().to_lowercase();

        let Some(authentication) = self.repository.find_by_email(&email).await? else {
            tracing::warn!(email = %email, "Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = self
            .authenticator
            .verify_password(&command.password, &authentication.password_hash)
        {
            tracing::warn!(user_id = %authentication.user_id, error = %e, "Login rejected");
            return Err(e.into());
        }

        let refresh_token_id = Uuid::new_v4().to_string();
        let pair = self
            .authenticator
            .issue_token_pair(&Self::token_subject(&authentication), &refresh_token_id)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        self.repository
            .set_refresh_token_id(&authentication.id, Some(refresh_token_id))
            .await?;

        tracing::info!(
            user_id = %authentication.user_id,
            auth_id = %authentication.id,
            "User logged in"
        );

        Ok(pair.into())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self
            .authenticator
            .verify_refresh_token(refresh_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token verification failed");
                AuthError::InvalidToken(e.to_string())
            })?;

        let authentication = self
            .repository
            .find_by_refresh_token_id(&claims.token_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Refresh rejected: session revoked or replaced");
                AuthError::InvalidToken("Invalid token".to_string())
            })?;

        self.authenticator
            .issue_access_token(&Self::token_subject(&authentication))
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    async fn logout(&self, principal: &Principal) -> Result<(), AuthError> {
        let authentication = self
            .repository
            .find_by_id(&principal.auth_id)
            .await?
            .ok_or_else(|| AuthError::NotFound(principal.auth_id.to_string()))?;

        self.repository
            .set_refresh_token_id(&authentication.id, None)
            .await?;

        tracing::info!(user_id = %principal.user_id, "User logged out");
        Ok(())
    }

    fn authenticate(&self, access_token: &str) -> Result<Principal, AuthError> {
        let claims = self
            .authenticator
            .verify_access_token(access_token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let malformed = || AuthError::InvalidToken("Malformed token claims".to_string());
        let roles = Roles::parse(&claims.role).map_err(|_| malformed())?;

        Ok(Principal {
            auth_id: AuthenticationId::from_string(&claims.auth_id).map_err(|_| malformed())?,
            user_id: UserId::from_string(&claims.user_id).map_err(|_| malformed())?,
            email: claims.email,
            roles: roles.as_slice().to_vec(),
        })
    }
}
