use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use super::JsonBody;
use super::PageResponseData;
use super::QueryParams;
use super::SearchParams;
use crate::domain::principal::Principal;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Roles;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<ApiSuccess<PageResponseData<UserData>>, ApiError> {
    state
        .user_service
        .list_users(params.page_request())
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageResponseData::from_page(page, |ref user| user.into()),
            )
        })
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let id = UserId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .user_service
        .get_user(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let id = UserId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .user_service
        .update_user(&id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = UserId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .user_service
        .delete_user(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

/// The caller's own record; open to every authenticated user.
pub async fn profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .user_service
        .profile(&principal)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    name: String,
    email: String,
    password: String,
    roles: Vec<String>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ApiError> {
        let mut fields = FieldErrors::new();

        let name = fields.check("name", UserName::new(self.name));
        let email = fields.check("email", EmailAddress::new(self.email));
        let roles = fields.check("roles", Roles::parse(&self.roles));
        let password = fields.check("password", Password::new(self.password));

        match (name, email, roles, password) {
            (Some(name), Some(email), Some(roles), Some(password)) => Ok(RegisterUserCommand {
                name,
                email,
                roles,
                password,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    name: String,
    email: String,
    roles: Vec<String>,
    password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ApiError> {
        let mut fields = FieldErrors::new();

        let name = fields.check("name", UserName::new(self.name));
        let email = fields.check("email", EmailAddress::new(self.email));
        let roles = fields.check("roles", Roles::parse(&self.roles));
        let password = fields.check(
            "password",
            self.password
                .filter(|p| !p.is_empty())
                .map(Password::new)
                .transpose(),
        );

        match (name, email, roles, password) {
            (Some(name), Some(email), Some(roles), Some(password)) => Ok(UpdateUserCommand {
                name,
                email,
                roles,
                password,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            roles: user.roles.names(),
            status: user.status.as_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub user: UserData,
    pub permissions: Vec<String>,
}

impl From<&UserProfile> for ProfileData {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user: (&profile.user).into(),
            permissions: profile.permissions.clone(),
        }
    }
}
