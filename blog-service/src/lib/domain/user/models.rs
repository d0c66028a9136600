use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::identifier::uuid_identifier;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::PasswordPolicyError;
use crate::domain::user::errors::RoleError;
use crate::domain::user::errors::UserNameError;

uuid_identifier!(
    /// User unique identifier type
    UserId
);

/// User aggregate entity.
///
/// Credentials live in the separate authentication record; a user owns at
/// most one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub roles: Roles,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display name value type. Trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    const MAX_LENGTH: usize = 255;

    pub fn new(name: String) -> Result<Self, UserNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(UserNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored lowercase
/// so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
            Role::SuperAdmin => "SuperAdmin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            "SuperAdmin" => Ok(Role::SuperAdmin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty, duplicate-free set of roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roles(Vec<Role>);

impl Roles {
    pub fn new(roles: Vec<Role>) -> Result<Self, RoleError> {
        let mut unique: Vec<Role> = Vec::with_capacity(roles.len());
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }

        if unique.is_empty() {
            Err(RoleError::Empty)
        } else {
            Ok(Self(unique))
        }
    }

    /// Parse role names, failing on the first unknown one.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, RoleError> {
        let roles = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Role>, RoleError>>()?;
        Self::new(roles)
    }

    pub fn single(role: Role) -> Self {
        Self(vec![role])
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn as_slice(&self) -> &[Role] {
        &self.0
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|r| r.as_str().to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
        }
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(UserStatus::Active),
            other => Err(format!("unknown user status: {}", other)),
        }
    }
}

/// Plaintext password as submitted, before hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;
    const MAX_BYTES: usize = 72;

    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.chars().count() < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
            })
        } else if password.len() > Self::MAX_BYTES {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_BYTES,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub roles: Roles,
    pub password: Password,
}

/// Command to replace a user's details. The password is only changed when
/// present.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub roles: Roles,
    pub password: Option<Password>,
}

/// A user together with the permissions derived from their roles.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user: User,
    pub permissions: Vec<String>,
}

impl UserProfile {
    pub fn for_user(user: User) -> Self {
        let permissions = if user.roles.contains(Role::SuperAdmin) {
            vec!["users".to_string()]
        } else {
            Vec::new()
        };

        Self { user, permissions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalised() {
        let email = EmailAddress::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_garbage() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_roles_parse_and_dedupe() {
        let roles = Roles::parse(&["Admin", "SuperAdmin", "Admin"]).unwrap();
        assert_eq!(roles.as_slice(), &[Role::Admin, Role::SuperAdmin]);
    }

    #[test]
    fn test_roles_reject_unknown_and_empty() {
        assert_eq!(
            Roles::parse(&["Root"]),
            Err(RoleError::Unknown("Root".to_string()))
        );
        assert_eq!(Roles::parse::<&str>(&[]), Err(RoleError::Empty));
    }

    #[test]
    fn test_user_name_trimmed() {
        assert_eq!(UserName::new("  Ana ".to_string()).unwrap().as_str(), "Ana");
        assert_eq!(UserName::new("   ".to_string()), Err(UserNameError::Empty));
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("12345".to_string()).is_err());
        assert!(Password::new("a".repeat(73)).is_err());
        assert!(Password::new("secret123".to_string()).is_ok());
    }

    #[test]
    fn test_profile_permissions() {
        let now = Utc::now();
        let mut user = User {
            id: UserId::new(),
            name: UserName::new("Root".to_string()).unwrap(),
            email: EmailAddress::new("root@example.com".to_string()).unwrap(),
            roles: Roles::single(Role::SuperAdmin),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(UserProfile::for_user(user.clone()).permissions, vec!["users"]);

        user.roles = Roles::single(Role::Admin);
        assert!(UserProfile::for_user(user).permissions.is_empty());
    }
}
