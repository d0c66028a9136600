//! Authentication utilities library
//!
//! Provides the credential and token infrastructure used by the blog service:
//! - Salted bcrypt password hashing
//! - HS256 access and refresh tokens signed with separate secrets
//! - Authentication coordination
//!
//! The service defines its own authentication ports and adapts these
//! implementations behind them.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(4);
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Token Flow
//! ```
//! use auth::{Authenticator, AuthenticatorConfig, PasswordHasher, TokenSubject};
//! use chrono::Duration;
//!
//! let config = AuthenticatorConfig {
//!     access_secret: "access_secret_key_at_least_32_bytes!".to_string(),
//!     refresh_secret: "refresh_secret_key_at_least_32_bytes".to_string(),
//!     issuer: "blog".to_string(),
//!     access_token_ttl: Duration::minutes(15),
//!     refresh_token_ttl: Duration::hours(24),
//! };
//! let auth = Authenticator::new(&config, PasswordHasher::with_cost(4));
//!
//! let subject = TokenSubject {
//!     auth_id: "a1".to_string(),
//!     user_id: "u1".to_string(),
//!     email: "alice@example.com".to_string(),
//!     roles: vec!["Admin".to_string()],
//! };
//! let pair = auth.issue_token_pair(&subject, "refresh-id").unwrap();
//! let claims = auth.verify_refresh_token(&pair.refresh_token).unwrap();
//! assert_eq!(claims.token_id, "refresh-id");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::AuthenticatorConfig;
pub use authenticator::TokenPair;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use jwt::TokenSubject;
pub use password::PasswordError;
pub use password::PasswordHasher;
