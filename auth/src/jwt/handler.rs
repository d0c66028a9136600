use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type so access and refresh tokens can share one
/// implementation while being signed with different secrets. Only HS256 is
/// accepted on decode and the issuer must match.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `issuer` - Expected `iss` claim on every decoded token
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Access and refresh tokens must use distinct secrets
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// # Errors
    /// * `Malformed` - Token is not a well-formed JWT
    /// * `InvalidSigningMethod` - Header names an algorithm other than HS256
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `Expired` - `exp` is in the past
    /// * `InvalidIssuer` - `iss` differs from the configured issuer
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[self.issuer.as_str()]);

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    JwtError::InvalidSigningMethod
                }
                ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => JwtError::Malformed,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        iss: String,
        exp: i64,
    }

    fn claims(iss: &str, exp_offset: i64) -> TestClaims {
        TestClaims {
            sub: "user123".to_string(),
            iss: iss.to_string(),
            exp: Utc::now().timestamp() + exp_offset,
        }
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(SECRET, "blog");
        let original = claims("blog", 600);

        let token = handler.encode(&original).expect("Failed to encode token");
        let decoded: TestClaims = handler.decode(&token).expect("Failed to decode token");

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_malformed_token() {
        let handler = JwtHandler::new(SECRET, "blog");

        let result = handler.decode::<TestClaims>("not-a-token");
        assert_eq!(result, Err(JwtError::Malformed));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let signer = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!", "blog");
        let verifier = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!", "blog");

        let token = signer.encode(&claims("blog", 600)).unwrap();

        assert_eq!(
            verifier.decode::<TestClaims>(&token),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(SECRET, "blog");
        let token = handler.encode(&claims("blog", -3600)).unwrap();

        assert_eq!(handler.decode::<TestClaims>(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_decode_foreign_issuer() {
        let handler = JwtHandler::new(SECRET, "blog");
        let token = handler.encode(&claims("someone-else", 600)).unwrap();

        assert_eq!(
            handler.decode::<TestClaims>(&token),
            Err(JwtError::InvalidIssuer)
        );
    }

    #[test]
    fn test_decode_rejects_other_algorithms() {
        let handler = JwtHandler::new(SECRET, "blog");
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims("blog", 600),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            handler.decode::<TestClaims>(&token),
            Err(JwtError::InvalidSigningMethod)
        );
    }
}
