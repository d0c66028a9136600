use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::parse_timestamp;
use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use super::JsonBody;
use super::PageResponseData;
use super::QueryParams;
use crate::domain::article::errors::SortError;
use crate::domain::article::models::Article;
use crate::domain::article::models::ArticleContent;
use crate::domain::article::models::ArticleId;
use crate::domain::article::models::ArticleSort;
use crate::domain::article::models::ArticleStats;
use crate::domain::article::models::ArticleStatus;
use crate::domain::article::models::ArticleTitle;
use crate::domain::article::models::CreateArticleCommand;
use crate::domain::article::models::Excerpt;
use crate::domain::article::models::ListArticlesQuery;
use crate::domain::article::models::SourceUrl;
use crate::domain::article::models::UpdateArticleCommand;
use crate::domain::article::models::UpdateStatusCommand;
use crate::domain::article::ports::ArticleServicePort;
use crate::domain::category::models::CategoryId;
use crate::domain::identifier::IdError;
use crate::domain::pagination::PageRequest;
use crate::domain::principal::Principal;
use crate::domain::tag::models::TagId;
use crate::inbound::http::router::AppState;

pub async fn create_article(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<CreateArticleRequest>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    state
        .article_service
        .create_article(&principal, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::CREATED, article.into()))
}

pub async fn create_article_from_url(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<CreateFromUrlRequest>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    let url = SourceUrl::new(&body.url).map_err(|e| ApiError::field("url", e))?;

    state
        .article_service
        .create_article_from_url(&principal, url)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::CREATED, article.into()))
}

pub async fn list_articles(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListArticlesParams>,
) -> Result<ApiSuccess<PageResponseData<ArticleData>>, ApiError> {
    let query = params.into_query(ArticleSort::parse)?;

    state
        .article_service
        .list_articles(query)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageResponseData::from_page(page, |ref article| article.into()),
            )
        })
}

pub async fn article_stats(
    State(state): State<AppState>,
) -> Result<ApiSuccess<ArticleStatsData>, ApiError> {
    state
        .article_service
        .article_stats()
        .await
        .map_err(ApiError::from)
        .map(|stats| ApiSuccess::new(StatusCode::OK, stats.into()))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    let id = parse_article_id(&id)?;

    state
        .article_service
        .get_article(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::OK, article.into()))
}

pub async fn get_article_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    state
        .article_service
        .get_article_by_slug(&slug)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::OK, article.into()))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateArticleRequest>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    let id = parse_article_id(&id)?;

    state
        .article_service
        .update_article(&id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::OK, article.into()))
}

pub async fn update_article_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateStatusRequest>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    let id = parse_article_id(&id)?;

    state
        .article_service
        .update_article_status(&id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::OK, article.into()))
}

pub async fn update_article_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateTagsRequest>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    let id = parse_article_id(&id)?;
    let tag_ids = parse_tag_ids(&body.tag_ids).map_err(|e| ApiError::field("tag_ids", e))?;

    state
        .article_service
        .update_article_tags(&id, tag_ids)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::OK, article.into()))
}

pub async fn set_featured_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<FeaturedPositionRequest>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    let id = parse_article_id(&id)?;

    state
        .article_service
        .set_featured_position(&id, body.position)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::OK, article.into()))
}

pub async fn remove_featured_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<ArticleData>, ApiError> {
    let id = parse_article_id(&id)?;

    state
        .article_service
        .remove_featured_position(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref article| ApiSuccess::new(StatusCode::OK, article.into()))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = parse_article_id(&id)?;

    state
        .article_service
        .delete_article(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

pub async fn hard_delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = parse_article_id(&id)?;

    state
        .article_service
        .hard_delete_article(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

fn parse_article_id(id: &str) -> Result<ArticleId, ApiError> {
    ArticleId::from_string(id).map_err(|e| ApiError::field("id", e))
}

fn parse_tag_ids(ids: &[String]) -> Result<Vec<TagId>, IdError> {
    ids.iter().map(|id| TagId::from_string(id)).collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleRequest {
    title: String,
    content: String,
    excerpt: Option<String>,
    image_url: Option<String>,
    category_id: String,
    #[serde(default)]
    tag_ids: Vec<String>,
    status: Option<String>,
    publish_at: Option<String>,
}

impl CreateArticleRequest {
    fn try_into_command(self) -> Result<CreateArticleCommand, ApiError> {
        let mut fields = FieldErrors::new();

        let title = fields.check("title", ArticleTitle::new(self.title));
        let content = fields.check("content", ArticleContent::new(self.content));
        let excerpt = fields.check(
            "excerpt",
            non_blank(self.excerpt).map(Excerpt::new).transpose(),
        );
        let category_id = fields.check("category_id", CategoryId::from_string(&self.category_id));
        let tag_ids = fields.check("tag_ids", parse_tag_ids(&self.tag_ids));
        let status = fields.check(
            "status",
            self.status.as_deref().map(str::parse::<ArticleStatus>).transpose(),
        );
        let publish_at = fields.check(
            "publish_at",
            non_blank(self.publish_at).as_deref().map(parse_timestamp).transpose(),
        );

        match (title, content, excerpt, category_id, tag_ids, status, publish_at) {
            (
                Some(title),
                Some(content),
                Some(excerpt),
                Some(category_id),
                Some(tag_ids),
                Some(status),
                Some(publish_at),
            ) => Ok(CreateArticleCommand {
                title,
                content,
                excerpt,
                image_url: non_blank(self.image_url),
                category_id,
                tag_ids,
                status: status.unwrap_or(ArticleStatus::Draft),
                publish_at,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateArticleRequest {
    title: String,
    content: String,
    excerpt: Option<String>,
    image_url: Option<String>,
    category_id: Option<String>,
    tag_ids: Option<Vec<String>>,
    status: Option<String>,
    publish_at: Option<String>,
}

impl UpdateArticleRequest {
    fn try_into_command(self) -> Result<UpdateArticleCommand, ApiError> {
        let mut fields = FieldErrors::new();

        let title = fields.check("title", ArticleTitle::new(self.title));
        let content = fields.check("content", ArticleContent::new(self.content));
        let excerpt = fields.check(
            "excerpt",
            non_blank(self.excerpt).map(Excerpt::new).transpose(),
        );
        let category_id = fields.check(
            "category_id",
            self.category_id.as_deref().map(CategoryId::from_string).transpose(),
        );
        let tag_ids = fields.check(
            "tag_ids",
            self.tag_ids.as_deref().map(parse_tag_ids).transpose(),
        );
        let status = fields.check(
            "status",
            self.status.as_deref().map(str::parse::<ArticleStatus>).transpose(),
        );
        let publish_at = fields.check(
            "publish_at",
            non_blank(self.publish_at).as_deref().map(parse_timestamp).transpose(),
        );

        match (title, content, excerpt, category_id, tag_ids, status, publish_at) {
            (
                Some(title),
                Some(content),
                Some(excerpt),
                Some(category_id),
                Some(tag_ids),
                Some(status),
                Some(publish_at),
            ) => Ok(UpdateArticleCommand {
                title,
                content,
                excerpt,
                image_url: non_blank(self.image_url),
                category_id,
                tag_ids,
                status,
                publish_at,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    status: String,
    publish_at: Option<String>,
}

impl UpdateStatusRequest {
    fn try_into_command(self) -> Result<UpdateStatusCommand, ApiError> {
        let mut fields = FieldErrors::new();

        let status = fields.check("status", self.status.parse::<ArticleStatus>());
        let publish_at = fields.check(
            "publish_at",
            non_blank(self.publish_at).as_deref().map(parse_timestamp).transpose(),
        );

        match (status, publish_at) {
            (Some(status), Some(publish_at)) => Ok(UpdateStatusCommand { status, publish_at }),
            _ => Err(fields.into_error()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTagsRequest {
    tag_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedPositionRequest {
    position: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFromUrlRequest {
    url: String,
}

/// Listing filters shared by the admin and public article listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArticlesParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListArticlesParams {
    pub fn into_query(
        self,
        parse_sort: fn(Option<&str>, Option<&str>) -> Result<ArticleSort, SortError>,
    ) -> Result<ListArticlesQuery, ApiError> {
        let mut fields = FieldErrors::new();

        let category_id = fields.check(
            "category_id",
            non_blank(self.category_id).as_deref().map(CategoryId::from_string).transpose(),
        );
        let tag_id = fields.check(
            "tag_id",
            non_blank(self.tag_id).as_deref().map(TagId::from_string).transpose(),
        );
        let status = fields.check(
            "status",
            non_blank(self.status).as_deref().map(str::parse::<ArticleStatus>).transpose(),
        );
        let start_date = fields.check(
            "start_date",
            non_blank(self.start_date).as_deref().map(parse_timestamp).transpose(),
        );
        let end_date = fields.check(
            "end_date",
            non_blank(self.end_date).as_deref().map(parse_timestamp).transpose(),
        );
        let sort = match parse_sort(self.sort_by.as_deref(), self.sort_order.as_deref()) {
            Ok(sort) => Some(sort),
            Err(e @ SortError::UnknownField(_)) => {
                fields.add("sort_by", e);
                None
            }
            Err(e @ SortError::UnknownOrder(_)) => {
                fields.add("sort_order", e);
                None
            }
        };

        match (category_id, tag_id, status, start_date, end_date, sort) {
            (
                Some(category_id),
                Some(tag_id),
                Some(status),
                Some(start_date),
                Some(end_date),
                Some(sort),
            ) => Ok(ListArticlesQuery {
                page: PageRequest::new(self.page, self.page_size),
                category_id,
                tag_id,
                status,
                search: non_blank(self.search).map(|s| s.trim().to_string()),
                start_date,
                end_date,
                sort,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRefData {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorData {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRefData {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleData {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub category_id: String,
    pub category: Option<CategoryRefData>,
    pub author_id: String,
    pub author: Option<AuthorData>,
    pub tags: Vec<TagRefData>,
    pub status: String,
    pub views: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub featured: Option<u8>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Article> for ArticleData {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.to_string(),
            title: article.title.as_str().to_string(),
            slug: article.slug.clone(),
            content: article.content.as_str().to_string(),
            excerpt: article.excerpt.as_ref().map(|e| e.as_str().to_string()),
            image_url: article.image_url.clone(),
            category_id: article.category_id.to_string(),
            category: article.category.as_ref().map(|c| CategoryRefData {
                id: c.id.to_string(),
                name: c.name.clone(),
                slug: c.slug.clone(),
            }),
            author_id: article.author_id.to_string(),
            author: article.author.as_ref().map(|a| AuthorData {
                id: a.id.to_string(),
                name: a.name.clone(),
            }),
            tags: article
                .tags
                .iter()
                .map(|t| TagRefData {
                    id: t.id.to_string(),
                    name: t.name.clone(),
                    slug: t.slug.clone(),
                })
                .collect(),
            status: article.status.as_str().to_string(),
            views: article.views,
            published_at: article.published_at,
            featured: article.featured.map(|p| p.value()),
            source: article.source.clone(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleStatsData {
    pub total_articles: i64,
    pub published_articles: i64,
    pub draft_articles: i64,
    pub total_views: i64,
}

impl From<ArticleStats> for ArticleStatsData {
    fn from(stats: ArticleStats) -> Self {
        Self {
            total_articles: stats.total_articles,
            published_articles: stats.published_articles,
            draft_articles: stats.draft_articles,
            total_views: stats.total_views,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateArticleRequest {
        CreateArticleRequest {
            title: "Hello World".to_string(),
            content: "Body".to_string(),
            excerpt: Some("  ".to_string()),
            image_url: None,
            category_id: CategoryId::new().to_string(),
            tag_ids: vec![],
            status: None,
            publish_at: None,
        }
    }

    #[test]
    fn test_create_request_defaults_to_draft() {
        let command = create_request().try_into_command().unwrap();

        assert_eq!(command.status, ArticleStatus::Draft);
        assert!(command.excerpt.is_none());
        assert!(command.publish_at.is_none());
    }

    #[test]
    fn test_create_request_reports_every_bad_field() {
        let request = CreateArticleRequest {
            title: "Hi".to_string(),
            category_id: "nope".to_string(),
            status: Some("live".to_string()),
            publish_at: Some("someday".to_string()),
            ..create_request()
        };

        match request.try_into_command() {
            Err(ApiError::Validation { fields, .. }) => {
                let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["category_id", "publish_at", "status", "title"]);
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_list_params_sort_errors_name_their_field() {
        let params = ListArticlesParams {
            sort_order: Some("sideways".to_string()),
            ..Default::default()
        };

        match params.into_query(ArticleSort::parse) {
            Err(ApiError::Validation { fields, .. }) => {
                assert!(fields.contains_key("sort_order"))
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_public_listing_rejects_created_at_sort() {
        let params = ListArticlesParams {
            sort_by: Some("created_at".to_string()),
            ..Default::default()
        };

        assert!(params.into_query(ArticleSort::parse_public).is_err());
    }
}
