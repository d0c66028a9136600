use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::PageResponseData;
use super::QueryParams;
use super::SearchParams;
use crate::domain::tag::models::Tag;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;
use crate::domain::tag::models::ListTagsQuery;
use crate::domain::tag::ports::TagServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_tag(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TagRequest>,
) -> Result<ApiSuccess<TagData>, ApiError> {
    let name = TagName::new(body.name).map_err(|e| ApiError::field("name", e))?;

    state
        .tag_service
        .create_tag(name)
        .await
        .map_err(ApiError::from)
        .map(|ref tag| ApiSuccess::new(StatusCode::CREATED, tag.into()))
}

pub async fn list_tags(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<ApiSuccess<PageResponseData<TagData>>, ApiError> {
    let query = ListTagsQuery {
        page: params.page_request(),
        search: params.search(),
    };

    state
        .tag_service
        .list_tags(query)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageResponseData::from_page(page, |ref tag| tag.into()),
            )
        })
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<TagData>, ApiError> {
    let id = TagId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .tag_service
        .get_tag(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref tag| ApiSuccess::new(StatusCode::OK, tag.into()))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<TagRequest>,
) -> Result<ApiSuccess<TagData>, ApiError> {
    let id = TagId::from_string(&id).map_err(|e| ApiError::field("id", e))?;
    let name = TagName::new(body.name).map_err(|e| ApiError::field("name", e))?;

    state
        .tag_service
        .update_tag(&id, name)
        .await
        .map_err(ApiError::from)
        .map(|ref tag| ApiSuccess::new(StatusCode::OK, tag.into()))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = TagId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .tag_service
        .delete_tag(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagRequest {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagData {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Tag> for TagData {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            name: tag.name.as_str().to_string(),
            slug: tag.slug.clone(),
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}
