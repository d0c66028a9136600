use std::collections::BTreeMap;
use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::article::errors::ArticleError;
use crate::domain::authentication::errors::AuthError;
use crate::domain::category::errors::CategoryError;
use crate::domain::demo::errors::DemoError;
use crate::domain::demo::errors::DemoFieldError;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::tag::errors::TagError;
use crate::domain::user::errors::UserError;

pub mod articles;
pub mod authentications;
pub mod categories;
pub mod demos;
pub mod ping;
pub mod public;
pub mod tags;
pub mod users;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error surfaced to HTTP clients.
///
/// Conflicts are reported as 400 with a fixed message. Internal errors keep
/// their detail out of the body; [`InternalErrorDetail`] carries it to the
/// layer that decides whether the environment may see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
}

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const DATA_ALREADY_EXISTS: &str = "Data already exists";
pub const FORBIDDEN_ACCESS: &str = "Forbidden access";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

impl ApiError {
    /// Validation failure on a single field.
    pub fn field(name: &str, error: impl Display) -> Self {
        let message = error.to_string();
        ApiError::Validation {
            fields: BTreeMap::from([(name.to_string(), message.clone())]),
            message,
        }
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden(FORBIDDEN_ACCESS.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

/// Detail of a 500 response, attached as a response extension.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Internal server error");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let mut response = (
                    status,
                    Json(ApiResponseBody::new_error(
                        status,
                        INTERNAL_SERVER_ERROR.to_string(),
                    )),
                )
                    .into_response();
                response.extensions_mut().insert(InternalErrorDetail(detail));
                response
            }
            ApiError::Validation { message, fields } => {
                let status = StatusCode::BAD_REQUEST;
                (
                    status,
                    Json(ApiResponseBody::new_validation_error(status, message, fields)),
                )
                    .into_response()
            }
            ApiError::Conflict(detail) => {
                tracing::debug!(error = %detail, "Unique constraint violated");
                let status = StatusCode::BAD_REQUEST;
                (
                    status,
                    Json(ApiResponseBody::new_error(
                        status,
                        DATA_ALREADY_EXISTS.to_string(),
                    )),
                )
                    .into_response()
            }
            ApiError::Unauthorized(message) => {
                let status = StatusCode::UNAUTHORIZED;
                (status, Json(ApiResponseBody::new_error(status, message))).into_response()
            }
            ApiError::Forbidden(message) => {
                let status = StatusCode::FORBIDDEN;
                (status, Json(ApiResponseBody::new_error(status, message))).into_response()
            }
            ApiError::NotFound(message) => {
                let status = StatusCode::NOT_FOUND;
                (status, Json(ApiResponseBody::new_error(status, message))).into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            message: rejection.body_text(),
            fields: BTreeMap::new(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation {
            message: rejection.body_text(),
            fields: BTreeMap::new(),
        }
    }
}

/// JSON body whose rejections use the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string whose rejections use the API error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Collects per-field validation failures while a request is converted into
/// a domain command.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error of `result` under `field`, if any.
    pub fn check<T, E: Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.insert(field.to_string(), e.to_string());
                None
            }
        }
    }

    pub fn add(&mut self, field: &str, message: impl Display) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_error(self) -> ApiError {
        ApiError::Validation {
            message: VALIDATION_FAILED.to_string(),
            fields: self.0,
        }
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        })
        .map_err(|_| format!("Invalid date: {}", value))
}

impl From<ArticleError> for ApiError {
    fn from(err: ArticleError) -> Self {
        match err {
            ArticleError::InvalidArticleId(_) => ApiError::field("id", err),
            ArticleError::InvalidTitle(_) => ApiError::field("title", err),
            ArticleError::InvalidContent(_) => ApiError::field("content", err),
            ArticleError::InvalidExcerpt(_) => ApiError::field("excerpt", err),
            ArticleError::InvalidStatus(_) | ArticleError::InvalidStatusTransition { .. } => {
                ApiError::field("status", err)
            }
            ArticleError::InvalidSort(_) => ApiError::field("sort_by", err),
            ArticleError::InvalidSourceUrl(_) | ArticleError::FetchFailed(_) => {
                ApiError::field("url", err)
            }
            ArticleError::InvalidPosition(_) => ApiError::field("position", err),
            ArticleError::PublishDateRequired => ApiError::field("publish_at", err),
            ArticleError::UnknownTags(_) => ApiError::field("tag_ids", err),
            ArticleError::CategoryNotFound(_) => ApiError::field("category_id", err),
            ArticleError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ArticleError::SlugAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            ArticleError::DatabaseError(_) | ArticleError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::InvalidCategoryId(_) => ApiError::field("id", err),
            CategoryError::InvalidName(_) => ApiError::field("name", err),
            CategoryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CategoryError::SlugAlreadyExists(_) | CategoryError::InUse(_) => {
                ApiError::Conflict(err.to_string())
            }
            CategoryError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<TagError> for ApiError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::InvalidTagId(_) => ApiError::field("id", err),
            TagError::InvalidName(_) => ApiError::field("name", err),
            TagError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TagError::SlugAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            TagError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(_) => ApiError::field("id", err),
            UserError::InvalidName(_) => ApiError::field("name", err),
            UserError::InvalidEmail(_) => ApiError::field("email", err),
            UserError::InvalidRole(_) => ApiError::field("roles", err),
            UserError::InvalidPassword(_) => ApiError::field("password", err),
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) | UserError::InUse(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::PasswordHashing(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken(_) | AuthError::Token(_) | AuthError::NotFound(_) => {
                tracing::debug!(error = %err, "Token rejected");
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthError::Password(_) | AuthError::DatabaseError(_) | AuthError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<DemoError> for ApiError {
    fn from(err: DemoError) -> Self {
        match err {
            DemoError::InvalidDemoId(_) => ApiError::field("id", err),
            DemoError::InvalidField(
                DemoFieldError::Empty { field } | DemoFieldError::TooLong { field, .. },
            ) => ApiError::field(field, err),
            DemoError::InvalidPhone(_) => ApiError::field("phone", err),
            DemoError::InvalidEmail(_) => ApiError::field("email", err),
            DemoError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DemoError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                message,
                fields: None,
                error: None,
            },
        }
    }

    pub fn new_validation_error(
        status_code: StatusCode,
        message: String,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                message,
                fields: Some(fields),
                error: None,
            },
        }
    }

    pub fn new_internal_error(detail: String) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            data: ApiErrorData {
                message: INTERNAL_SERVER_ERROR.to_string(),
                fields: None,
                error: Some(detail),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `page`, `page_size` and `search` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

impl SearchParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn search(self) -> Option<String> {
        self.search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Page envelope shared by every listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResponseData<T: Serialize + PartialEq> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T: Serialize + PartialEq> PageResponseData<T> {
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let page_number = page.request.page();
        let page_size = page.request.page_size();
        let total_pages = page.total_pages();
        let has_next = page.has_next();
        let has_previous = page.has_previous();
        let page = page.map(f);

        Self {
            items: page.items,
            page: page_number,
            page_size,
            total_items: page.total_items,
            total_pages,
            has_next,
            has_previous,
        }
    }
}
