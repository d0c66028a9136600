use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::Authentication;
use crate::domain::authentication::models::AuthenticationId;
use crate::domain::authentication::ports::AuthenticationRepository;
use crate::domain::user::models::Roles;
use crate::domain::user::models::UserId;

const SELECT_AUTHENTICATION: &str = r#"
    SELECT a.id, a.user_id, u.email, u.roles, a.password, a.refresh_token_id, a.updated_at
    FROM authentications a
    JOIN users u ON u.id = a.user_id
"#;

#[derive(sqlx::FromRow)]
struct AuthenticationRow {
    id: Uuid,
    user_id: Uuid,
    email: String,
    roles: Vec<String>,
    password: String,
    refresh_token_id: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AuthenticationRow> for Authentication {
    type Error = AuthError;

    fn try_from(row: AuthenticationRow) -> Result<Self, Self::Error> {
        Ok(Authentication {
            id: AuthenticationId(row.id),
            user_id: UserId(row.user_id),
            email: row.email,
            roles: Roles::parse(&row.roles).map_err(|e| AuthError::Unknown(e.to_string()))?,
            password_hash: row.password,
            refresh_token_id: row.refresh_token_id,
            updated_at: row.updated_at,
        })
    }
}

pub struct PostgresAuthenticationRepository {
    pool: PgPool,
}

impl PostgresAuthenticationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthenticationRepository for PostgresAuthenticationRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Authentication>, AuthError> {
        let row: Option<AuthenticationRow> =
            sqlx::query_as(&format!("{} WHERE u.email = $1", SELECT_AUTHENTICATION))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Authentication::try_from).transpose()
    }

    async fn find_by_id(
        &self,
        id: &AuthenticationId,
    ) -> Result<Option<Authentication>, AuthError> {
        let row: Option<AuthenticationRow> =
            sqlx::query_as(&format!("{} WHERE a.id = $1", SELECT_AUTHENTICATION))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Authentication::try_from).transpose()
    }

    async fn find_by_refresh_token_id(
        &self,
        refresh_token_id: &str,
    ) -> Result<Option<Authentication>, AuthError> {
        let row: Option<AuthenticationRow> =
            sqlx::query_as(&format!("{} WHERE a.refresh_token_id = $1", SELECT_AUTHENTICATION))
                .bind(refresh_token_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Authentication::try_from).transpose()
    }

    async fn set_refresh_token_id(
        &self,
        id: &AuthenticationId,
        refresh_token_id: Option<String>,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE authentications
            SET refresh_token_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(refresh_token_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
