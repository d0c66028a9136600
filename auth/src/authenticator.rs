use chrono::Duration;
use chrono::Utc;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;
use crate::jwt::TokenSubject;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Settings for an [`Authenticator`].
#[derive(Debug, Clone)]
pub struct AuthenticatorConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

/// Authentication coordinator combining password verification and JWT generation.
///
/// Access and refresh tokens are signed with separate secrets so a leaked
/// refresh secret cannot mint access tokens and vice versa.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    access_tokens: JwtHandler,
    refresh_tokens: JwtHandler,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

/// Access and refresh token issued together on login.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Secrets, issuer and token lifetimes
    /// * `password_hasher` - Hasher used for stored credentials
    pub fn new(config: &AuthenticatorConfig, password_hasher: PasswordHasher) -> Self {
        Self {
            password_hasher,
            access_tokens: JwtHandler::new(config.access_secret.as_bytes(), &config.issuer),
            refresh_tokens: JwtHandler::new(config.refresh_secret.as_bytes(), &config.issuer),
            access_token_ttl: config.access_token_ttl,
            refresh_token_ttl: config.refresh_token_ttl,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against its stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be read
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue an access token and a refresh token bound to `refresh_token_id`.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(
        &self,
        subject: &TokenSubject,
        refresh_token_id: &str,
    ) -> Result<TokenPair, JwtError> {
        let now = Utc::now();
        let refresh = RefreshClaims::new(
            refresh_token_id,
            self.refresh_tokens.issuer(),
            now,
            self.refresh_token_ttl,
        );

        Ok(TokenPair {
            access_token: self.issue_access_token(subject)?,
            refresh_token: self.refresh_tokens.encode(&refresh)?,
        })
    }

    /// Issue a standalone access token.
    pub fn issue_access_token(&self, subject: &TokenSubject) -> Result<String, JwtError> {
        let claims = AccessClaims::new(
            subject,
            self.access_tokens.issuer(),
            Utc::now(),
            self.access_token_ttl,
        );
        self.access_tokens.encode(&claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.access_tokens.decode(token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.refresh_tokens.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        let config = AuthenticatorConfig {
            access_secret: "access_secret_key_at_least_32_bytes!".to_string(),
            refresh_secret: "refresh_secret_key_at_least_32_bytes".to_string(),
            issuer: "blog".to_string(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::hours(24),
        };
        Authenticator::new(&config, PasswordHasher::with_cost(4))
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            auth_id: "auth-1".to_string(),
            user_id: "user-1".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec!["SuperAdmin".to_string()],
        }
    }

    #[test]
    fn test_verify_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        assert!(authenticator.verify_password("my_password", &hash).is_ok());
        assert!(matches!(
            authenticator.verify_password("wrong_password", &hash),
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_token_pair_round_trip() {
        let authenticator = authenticator();
        let pair = authenticator.issue_token_pair(&subject(), "refresh-1").unwrap();

        let access = authenticator.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(access.auth_id, "auth-1");
        assert_eq!(access.role, vec!["SuperAdmin".to_string()]);

        let refresh = authenticator
            .verify_refresh_token(&pair.refresh_token)
            .unwrap();
        assert_eq!(refresh.token_id, "refresh-1");
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let authenticator = authenticator();
        let pair = authenticator.issue_token_pair(&subject(), "refresh-1").unwrap();

        assert_eq!(
            authenticator.verify_access_token(&pair.refresh_token),
            Err(JwtError::InvalidSignature)
        );
        assert_eq!(
            authenticator.verify_refresh_token(&pair.access_token),
            Err(JwtError::InvalidSignature)
        );
    }
}
