use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::articles::ArticleData;
use super::articles::ListArticlesParams;
use super::ApiError;
use super::ApiSuccess;
use super::PageResponseData;
use super::QueryParams;
use crate::domain::article::models::ArticleSort;
use crate::domain::article::models::PublicArticle;
use crate::domain::article::ports::ArticleServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_public_articles(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListArticlesParams>,
) -> Result<ApiSuccess<PageResponseData<ArticleData>>, ApiError> {
    let params = ListArticlesParams {
        status: None,
        ..params
    };
    let query = params.into_query(ArticleSort::parse_public)?;

    state
        .article_service
        .list_public_articles(query)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageResponseData::from_page(page, |ref article| article.into()),
            )
        })
}

pub async fn featured_articles(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ArticleData>>, ApiError> {
    state
        .article_service
        .featured_articles()
        .await
        .map_err(ApiError::from)
        .map(|articles| {
            ApiSuccess::new(StatusCode::OK, articles.iter().map(ArticleData::from).collect())
        })
}

/// Published article by slug. Counts a view without waiting for it.
pub async fn get_public_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiSuccess<PublicArticleData>, ApiError> {
    let public = state.article_service.get_public_article(&slug).await?;

    let _ = state.article_service.record_view(public.article.id);

    Ok(ApiSuccess::new(StatusCode::OK, (&public).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicArticleData {
    pub article: ArticleData,
    pub related: Vec<ArticleData>,
}

impl From<&PublicArticle> for PublicArticleData {
    fn from(public: &PublicArticle) -> Self {
        Self {
            article: (&public.article).into(),
            related: public.related.iter().map(ArticleData::from).collect(),
        }
    }
}
