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
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::domain::category::models::ListCategoriesQuery;
use crate::domain::category::ports::CategoryServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CategoryRequest>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    let name = CategoryName::new(body.name).map_err(|e| ApiError::field("name", e))?;

    state
        .category_service
        .create_category(name)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::CREATED, category.into()))
}

pub async fn list_categories(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<ApiSuccess<PageResponseData<CategoryData>>, ApiError> {
    let query = ListCategoriesQuery {
        page: params.page_request(),
        search: params.search(),
    };

    state
        .category_service
        .list_categories(query)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageResponseData::from_page(page, |ref category| category.into()),
            )
        })
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    let id = CategoryId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .category_service
        .get_category(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::OK, category.into()))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<CategoryRequest>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    let id = CategoryId::from_string(&id).map_err(|e| ApiError::field("id", e))?;
    let name = CategoryName::new(body.name).map_err(|e| ApiError::field("name", e))?;

    state
        .category_service
        .update_category(&id, name)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::OK, category.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = CategoryId::from_string(&id).map_err(|e| ApiError::field("id", e))?;

    state
        .category_service
        .delete_category(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryData {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.as_str().to_string(),
            slug: category.slug.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
