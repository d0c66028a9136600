use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::principal::Principal;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::models::UserStatus;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `password_hasher` - Hasher for new and changed passwords
    pub fn new(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    fn hash(&self, password: &Password) -> Result<String, UserError> {
        self.password_hasher
            .hash(password.expose())
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash(&command.password)?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            roles: command.roles,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(user, password_hash).await?;
        tracing::info!(user_id = %created.id, roles = ?created.roles.names(), "User registered");

        Ok(created)
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UserError> {
        self.repository.list(page).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        let password_hash = command
            .password
            .as_ref()
            .map(|password| self.hash(password))
            .transpose()?;

        user.name = command.name;
        user.email = command.email;
        user.roles = command.roles;
        user.updated_at = Utc::now();

        let updated = self.repository.update(user, password_hash).await?;
        tracing::info!(user_id = %updated.id, "User updated");

        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn profile(&self, principal: &Principal) -> Result<UserProfile, UserError> {
        self.get_user(&principal.user_id)
            .await
            .map(UserProfile::for_user)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::authentication::models::AuthenticationId;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::Roles;
    use crate::domain::user::models::UserName;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User, password_hash: String) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn list(&self, page: PageRequest) -> Result<Page<User>, UserError>;
            async fn update(&self, user: User, password_hash: Option<String>) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(Arc::new(repository), auth::PasswordHasher::with_cost(4))
    }

    fn existing_user(roles: Roles) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: UserName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            roles,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_create()
            .withf(|user, hash| {
                user.email.as_str() == "alice@example.com"
                    && user.status == UserStatus::Active
                    && hash.contains('$')
                    && !hash.contains("secret123")
            })
            .times(1)
            .returning(|user, _| Ok(user));

        let command = RegisterUserCommand {
            name: UserName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            roles: Roles::single(Role::Admin),
            password: Password::new("secret123".to_string()).unwrap(),
        };

        let user = service(repository).register(command).await.unwrap();
        assert_eq!(user.name.as_str(), "Alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_create().times(1).returning(|user, _| {
            Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()))
        });

        let command = RegisterUserCommand {
            name: UserName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            roles: Roles::single(Role::User),
            password: Password::new("secret123".to_string()).unwrap(),
        };

        let result = service(repository).register(command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash() {
        let user = existing_user(Roles::single(Role::User));
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        let found = user.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));
        repository
            .expect_update()
            .withf(|user, hash| user.roles.contains(Role::Admin) && hash.is_none())
            .times(1)
            .returning(|user, _| Ok(user));

        let command = UpdateUserCommand {
            name: UserName::new("Alice B".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            roles: Roles::single(Role::Admin),
            password: None,
        };

        let updated = service(repository)
            .update_user(&user_id, command)
            .await
            .unwrap();
        assert_eq!(updated.name.as_str(), "Alice B");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        repository.expect_update().times(0);

        let command = UpdateUserCommand {
            name: UserName::new("Ghost".to_string()).unwrap(),
            email: EmailAddress::new("ghost@example.com".to_string()).unwrap(),
            roles: Roles::single(Role::User),
            password: Some(Password::new("secret123".to_string()).unwrap()),
        };

        let result = service(repository).update_user(&UserId::new(), command).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_for_super_admin() {
        let user = existing_user(Roles::single(Role::SuperAdmin));
        let principal = Principal {
            auth_id: AuthenticationId::new(),
            user_id: user.id,
            email: user.email.as_str().to_string(),
            roles: vec![Role::SuperAdmin],
        };

        let mut repository = MockTestUserRepository::new();
        let found = user.clone();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == found.id)
            .returning(move |_| Ok(Some(user.clone())));

        let profile = service(repository).profile(&principal).await.unwrap();
        assert_eq!(profile.permissions, vec!["users".to_string()]);
    }
}
