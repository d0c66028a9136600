use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a short-lived access token.
///
/// Identifies the authentication record, the user, and the roles granted at
/// sign-in time. `sub` holds the user's email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    pub auth_id: String,
    pub user_id: String,
    pub email: String,
    pub role: Vec<String>,
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

impl AccessClaims {
    /// Build access claims valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Identity the token is issued for
    /// * `issuer` - Value written to `iss`
    /// * `now` - Issue time
    /// * `ttl` - Lifetime of the token
    pub fn new(subject: &TokenSubject, issuer: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            auth_id: subject.auth_id.clone(),
            user_id: subject.user_id.clone(),
            email: subject.email.clone(),
            role: subject.roles.clone(),
            sub: subject.email.clone(),
            iss: issuer.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
        }
    }
}

/// Claims carried by a refresh token.
///
/// `token_id` is the server-side handle; a token is only honoured while the
/// stored authentication record still references it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshClaims {
    pub token_id: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

impl RefreshClaims {
    pub fn new(token_id: &str, issuer: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token_id: token_id.to_string(),
            iss: issuer.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// The identity an access token is minted for.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSubject {
    pub auth_id: String,
    pub user_id: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject {
            auth_id: "auth-1".to_string(),
            user_id: "user-1".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec!["Admin".to_string()],
        }
    }

    #[test]
    fn test_access_claims_window() {
        let now = Utc::now();
        let claims = AccessClaims::new(&subject(), "blog", now, Duration::minutes(15));

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.iss, "blog");
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_access_claims_field_names() {
        let claims = AccessClaims::new(&subject(), "blog", Utc::now(), Duration::minutes(1));
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["auth_id"], "auth-1");
        assert_eq!(value["role"][0], "Admin");
    }

    #[test]
    fn test_refresh_claims_window() {
        let now = Utc::now();
        let claims = RefreshClaims::new("token-1", "blog", now, Duration::hours(24));

        assert_eq!(claims.token_id, "token-1");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }
}
