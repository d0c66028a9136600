use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::PasswordError;

/// Bytes of random salt mixed into every password before hashing.
pub const SALT_LENGTH: usize = 16;

/// Longest password bcrypt can meaningfully hash.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted bcrypt password hashing.
///
/// A random salt is appended to the password before bcrypt runs. The stored
/// form is `base64(salt)$base64(bcrypt_hash)` so verification can rebuild
/// the salted input.
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher using bcrypt's default cost (12).
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit bcrypt cost.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    ///
    /// # Returns
    /// Stored form `base64(salt)$base64(hash)`
    ///
    /// # Errors
    /// * `TooLong` - Password is longer than 72 bytes
    /// * `HashingFailed` - bcrypt rejected the input or cost
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }

        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);

        let hashed = bcrypt::hash(salted(password, &salt), self.cost)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(format!(
            "{}${}",
            STANDARD.encode(salt),
            STANDARD.encode(hashed.as_bytes())
        ))
    }

    /// Verify a password against a stored hash.
    ///
    /// A wrong password yields `Ok(false)`; only an unreadable stored value
    /// is an error.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored value is not in the salted format
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        let (encoded_salt, encoded_hash) = stored.split_once('$').ok_or_else(|| {
            PasswordError::VerificationFailed("Invalid password hash format".to_string())
        })?;

        let salt = STANDARD
            .decode(encoded_salt)
            .map_err(|e| PasswordError::VerificationFailed(format!("Invalid salt: {}", e)))?;
        let hash_bytes = STANDARD
            .decode(encoded_hash)
            .map_err(|e| PasswordError::VerificationFailed(format!("Invalid hash: {}", e)))?;
        let hash = String::from_utf8(hash_bytes)
            .map_err(|e| PasswordError::VerificationFailed(format!("Invalid hash: {}", e)))?;

        bcrypt::verify(salted(password, &salt), &hash)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn salted(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(password.len() + salt.len());
    input.extend_from_slice(password.as_bytes());
    input.extend_from_slice(salt);
    input
}
