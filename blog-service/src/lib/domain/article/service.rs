use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::domain::article::errors::ArticleError;
use crate::domain::article::featured::FeaturedSlotChange;
use crate::domain::article::lifecycle;
use crate::domain::article::models::Article;
use crate::domain::article::models::ArticleContent;
use crate::domain::article::models::ArticleId;
use crate::domain::article::models::ArticleScope;
use crate::domain::article::models::ArticleStats;
use crate::domain::article::models::ArticleTitle;
use crate::domain::article::models::CreateArticleCommand;
use crate::domain::article::models::Excerpt;
use crate::domain::article::models::ExternalArticleDraft;
use crate::domain::article::models::FeaturedPosition;
use crate::domain::article::models::ListArticlesQuery;
use crate::domain::article::models::PublicArticle;
use crate::domain::article::models::SourceUrl;
use crate::domain::article::models::UpdateArticleCommand;
use crate::domain::article::models::UpdateStatusCommand;
use crate::domain::article::ports::ArticleRepository;
use crate::domain::article::ports::ArticleServicePort;
use crate::domain::article::ports::ContentExtractor;
use crate::domain::category::models::EXTERNAL_CATEGORY_NAME;
use crate::domain::pagination::Page;
use crate::domain::principal::Principal;
use crate::domain::slug;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;
use crate::domain::tag::ports::TagRepository;

/// Related reads shown under a public article.
const RELATED_ARTICLES_LIMIT: i64 = 2;

/// Domain service implementation for article operations.
///
/// Owns every business rule around articles: slugs, the status lifecycle,
/// featured slots and URL ingestion. Repositories only move data.
pub struct ArticleService<AR, TR, CE>
where
    AR: ArticleRepository,
    TR: TagRepository,
    CE: ContentExtractor,
{
    repository: Arc<AR>,
    tags: Arc<TR>,
    extractor: Arc<CE>,
}

impl<AR, TR, CE> ArticleService<AR, TR, CE>
where
    AR: ArticleRepository,
    TR: TagRepository,
    CE: ContentExtractor,
{
    /// Create a new article service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Article persistence implementation
    /// * `tags` - Tag lookup used to validate tag ids
    /// * `extractor` - Content extraction for URL ingestion
    pub fn new(repository: Arc<AR>, tags: Arc<TR>, extractor: Arc<CE>) -> Self {
        Self {
            repository,
            tags,
            extractor,
        }
    }

    async fn find(&self, id: &ArticleId) -> Result<Article, ArticleError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ArticleError::NotFound(id.to_string()))
    }

    /// Deduplicate tag ids and make sure every one of them exists.
    async fn ensure_tags_exist(&self, tag_ids: &[TagId]) -> Result<Vec<TagId>, ArticleError> {
        let mut unique = tag_ids.to_vec();
        unique.sort();
        unique.dedup();

        if unique.is_empty() {
            return Ok(unique);
        }

        let found = self
            .tags
            .find_by_ids(&unique)
            .await
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let missing: Vec<String> = unique
            .iter()
            .filter(|id| !found.iter().any(|tag| tag.id == **id))
            .map(ToString::to_string)
            .collect();

        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Rejected unknown tag ids");
            return Err(ArticleError::UnknownTags(missing.join(", ")));
        }

        Ok(unique)
    }
}

/// Name of the tag an ingested article is filed under.
fn site_tag_name(site_name: &str, url: &SourceUrl) -> String {
    let name = site_name.trim();
    let name = if name.is_empty() {
        url.host().unwrap_or(EXTERNAL_CATEGORY_NAME)
    } else {
        name
    };
    name.chars().take(TagName::MAX_LENGTH).collect()
}

#[async_trait]
impl<AR, TR, CE> ArticleServicePort for ArticleService<AR, TR, CE>
where
    AR: ArticleRepository,
    TR: TagRepository,
    CE: ContentExtractor,
{
    async fn create_article(
        &self,
        principal: &Principal,
        command: CreateArticleCommand,
    ) -> Result<Article, ArticleError> {
        let now = Utc::now();
        let change = lifecycle::initial_status(command.status, command.publish_at, now)?;
        let tag_ids = self.ensure_tags_exist(&command.tag_ids).await?;
        let slug = slug::generate_unique_slug(self.repository.as_ref(), command.title.as_str()).await?;

        let article = Article {
            id: ArticleId::new(),
            title: command.title,
            slug,
            content: command.content,
            excerpt: command.excerpt,
            image_url: command.image_url,
            category_id: command.category_id,
            author_id: principal.user_id,
            status: change.status,
            views: 0,
            published_at: change.published_at,
            featured: None,
            source: None,
            category: None,
            author: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(article, tag_ids).await?;
        tracing::info!(
            article_id = %created.id,
            slug = %created.slug,
            status = %created.status,
            "Article created"
        );

        Ok(created)
    }

    async fn create_article_from_url(
        &self,
        principal: &Principal,
        url: SourceUrl,
    ) -> Result<Article, ArticleError> {
        let extracted = self.extractor.extract(&url).await.inspect_err(|e| {
            tracing::warn!(url = %url.as_str(), error = %e, "Content extraction failed");
        })?;

        let title = ArticleTitle::truncated(&extracted.title).map_err(|e| {
            ArticleError::FetchFailed(format!("{}: no usable title ({})", url.as_str(), e))
        })?;
        let content = ArticleContent::new(extracted.content).map_err(|_| {
            ArticleError::FetchFailed(format!("{}: no readable content", url.as_str()))
        })?;
        let excerpt = extracted
            .excerpt
            .as_deref()
            .map(str::trim)
            .filter(|excerpt| !excerpt.is_empty())
            .map(Excerpt::truncated);

        let draft = ExternalArticleDraft {
            id: ArticleId::new(),
            title,
            content,
            excerpt,
            image_url: extracted.image,
            site_name: site_tag_name(&extracted.site_name, &url),
            source_url: url.as_str().to_string(),
            author_id: principal.user_id,
            published_at: Utc::now(),
        };

        let article = self.repository.create_external(draft).await?;
        tracing::info!(
            article_id = %article.id,
            slug = %article.slug,
            source = %url.as_str(),
            "External article ingested"
        );

        Ok(article)
    }

    async fn update_article(
        &self,
        id: &ArticleId,
        command: UpdateArticleCommand,
    ) -> Result<Article, ArticleError> {
        let mut article = self.find(id).await?;
        let now = Utc::now();

        let target = command.status.unwrap_or(article.status);
        let change = lifecycle::evaluate_transition(
            article.status,
            article.published_at,
            target,
            command.publish_at,
            now,
        )
        .inspect_err(|e| {
            tracing::warn!(article_id = %id, from = %article.status, to = %target, error = %e, "Article update rejected");
        })?;

        let tag_ids = match command.tag_ids {
            Some(tag_ids) => Some(self.ensure_tags_exist(&tag_ids).await?),
            None => None,
        };

        if article.title != command.title
            && !slug::is_candidate_for(&article.slug, command.title.as_str())
        {
            article.slug =
                slug::generate_unique_slug(self.repository.as_ref(), command.title.as_str())
                    .await?;
        }

        article.title = command.title;
        article.content = command.content;
        if let Some(excerpt) = command.excerpt {
            article.excerpt = Some(excerpt);
        }
        if let Some(image_url) = command.image_url {
            article.image_url = Some(image_url);
        }
        if let Some(category_id) = command.category_id {
            article.category_id = category_id;
        }
        article.status = change.status;
        article.published_at = change.published_at;
        article.updated_at = now;

        let updated = self.repository.update(article, tag_ids).await?;
        tracing::info!(article_id = %updated.id, status = %updated.status, "Article updated");

        Ok(updated)
    }

    async fn update_article_status(
        &self,
        id: &ArticleId,
        command: UpdateStatusCommand,
    ) -> Result<Article, ArticleError> {
        let article = self.find(id).await?;

        let change = lifecycle::evaluate_transition(
            article.status,
            article.published_at,
            command.status,
            command.publish_at,
            Utc::now(),
        )
        .inspect_err(|e| {
            tracing::warn!(article_id = %id, from = %article.status, to = %command.status, error = %e, "Status change rejected");
        })?;

        let updated = self.repository.update_status(id, change).await?;
        tracing::info!(
            article_id = %id,
            from = %article.status,
            to = %updated.status,
            "Article status changed"
        );

        Ok(updated)
    }

    async fn update_article_tags(
        &self,
        id: &ArticleId,
        tag_ids: Vec<TagId>,
    ) -> Result<Article, ArticleError> {
        self.find(id).await?;
        let tag_ids = self.ensure_tags_exist(&tag_ids).await?;

        let updated = self.repository.replace_tags(id, tag_ids).await?;
        tracing::info!(article_id = %id, tags = updated.tags.len(), "Article tags replaced");

        Ok(updated)
    }

    async fn set_featured_position(
        &self,
        id: &ArticleId,
        position: i64,
    ) -> Result<Article, ArticleError> {
        let position = FeaturedPosition::new(position).inspect_err(|e| {
            tracing::warn!(article_id = %id, error = %e, "Featured position rejected");
        })?;

        let slots = self
            .repository
            .update_featured_slots(FeaturedSlotChange::Assign {
                article_id: *id,
                position,
            })
            .await?;
        tracing::info!(
            article_id = %id,
            position = position.value(),
            slots = ?slots.assignments(),
            "Featured position assigned"
        );

        self.find(id).await
    }

    async fn remove_featured_position(&self, id: &ArticleId) -> Result<Article, ArticleError> {
        let slots = self
            .repository
            .update_featured_slots(FeaturedSlotChange::Remove { article_id: *id })
            .await?;
        tracing::info!(article_id = %id, slots = ?slots.assignments(), "Featured position removed");

        self.find(id).await
    }

    async fn get_article(&self, id: &ArticleId) -> Result<Article, ArticleError> {
        self.find(id).await
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Article, ArticleError> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ArticleError::NotFound(slug.to_string()))
    }

    async fn list_articles(
        &self,
        query: ListArticlesQuery,
    ) -> Result<Page<Article>, ArticleError> {
        self.repository.list(&query, ArticleScope::All).await
    }

    async fn article_stats(&self) -> Result<ArticleStats, ArticleError> {
        self.repository.stats().await
    }

    async fn list_public_articles(
        &self,
        mut query: ListArticlesQuery,
    ) -> Result<Page<Article>, ArticleError> {
        query.status = None;
        self.repository.list(&query, ArticleScope::Published).await
    }

    async fn get_public_article(&self, slug: &str) -> Result<PublicArticle, ArticleError> {
        let article = self
            .repository
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| ArticleError::NotFound(slug.to_string()))?;
        let related = self
            .repository
            .find_related(&article, RELATED_ARTICLES_LIMIT)
            .await?;

        Ok(PublicArticle { article, related })
    }

    async fn featured_articles(&self) -> Result<Vec<Article>, ArticleError> {
        self.repository.list_featured().await
    }

    fn record_view(&self, id: ArticleId) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);

        tokio::spawn(async move {
            if let Err(e) = repository.increment_views(&id).await {
                tracing::warn!(article_id = %id, error = %e, "Failed to record article view");
            }
        })
    }

    async fn delete_article(&self, id: &ArticleId) -> Result<(), ArticleError> {
        self.repository.soft_delete(id).await?;
        tracing::info!(article_id = %id, "Article deleted");
        Ok(())
    }

    async fn hard_delete_article(&self, id: &ArticleId) -> Result<(), ArticleError> {
        self.repository.hard_delete(id).await?;
        tracing::info!(article_id = %id, "Article permanently deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::DateTime;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::article::featured::FeaturedSlots;
    use crate::domain::article::lifecycle::StatusChange;
    use crate::domain::article::models::ArticleStatus;
    use crate::domain::article::models::ExtractedArticle;
    use crate::domain::authentication::models::AuthenticationId;
    use crate::domain::category::models::CategoryId;
    use crate::domain::slug::SlugChecker;
    use crate::domain::tag::errors::TagError;
    use crate::domain::tag::models::ListTagsQuery;
    use crate::domain::tag::models::Tag;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::UserId;

    mock! {
        pub TestArticleRepository {}

        #[async_trait]
        impl SlugChecker for TestArticleRepository {
            type Error = ArticleError;
            async fn slug_exists(&self, slug: &str) -> Result<bool, ArticleError>;
        }

        #[async_trait]
        impl ArticleRepository for TestArticleRepository {
            async fn create(&self, article: Article, tag_ids: Vec<TagId>) -> Result<Article, ArticleError>;
            async fn create_external(&self, draft: ExternalArticleDraft) -> Result<Article, ArticleError>;
            async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleError>;
            async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleError>;
            async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleError>;
            async fn find_related(&self, article: &Article, limit: i64) -> Result<Vec<Article>, ArticleError>;
            async fn list(&self, query: &ListArticlesQuery, scope: ArticleScope) -> Result<Page<Article>, ArticleError>;
            async fn list_featured(&self) -> Result<Vec<Article>, ArticleError>;
            async fn stats(&self) -> Result<ArticleStats, ArticleError>;
            async fn update(&self, article: Article, tag_ids: Option<Vec<TagId>>) -> Result<Article, ArticleError>;
            async fn update_status(&self, id: &ArticleId, change: StatusChange) -> Result<Article, ArticleError>;
            async fn replace_tags(&self, id: &ArticleId, tag_ids: Vec<TagId>) -> Result<Article, ArticleError>;
            async fn update_featured_slots(&self, change: FeaturedSlotChange) -> Result<FeaturedSlots, ArticleError>;
            async fn increment_views(&self, id: &ArticleId) -> Result<(), ArticleError>;
            async fn soft_delete(&self, id: &ArticleId) -> Result<(), ArticleError>;
            async fn hard_delete(&self, id: &ArticleId) -> Result<(), ArticleError>;
        }
    }

    mock! {
        pub TestTagRepository {}

        #[async_trait]
        impl SlugChecker for TestTagRepository {
            type Error = TagError;
            async fn slug_exists(&self, slug: &str) -> Result<bool, TagError>;
        }

        #[async_trait]
        impl TagRepository for TestTagRepository {
            async fn create(&self, tag: Tag) -> Result<Tag, TagError>;
            async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagError>;
            async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagError>;
            async fn list(&self, query: &ListTagsQuery) -> Result<Page<Tag>, TagError>;
            async fn update(&self, tag: Tag) -> Result<Tag, TagError>;
            async fn delete(&self, id: &TagId) -> Result<(), TagError>;
        }
    }

    mock! {
        pub TestContentExtractor {}

        #[async_trait]
        impl ContentExtractor for TestContentExtractor {
            async fn extract(&self, url: &SourceUrl) -> Result<ExtractedArticle, ArticleError>;
        }
    }

    type TestService =
        ArticleService<MockTestArticleRepository, MockTestTagRepository, MockTestContentExtractor>;

    fn service(repository: MockTestArticleRepository) -> TestService {
        service_with(
            repository,
            MockTestTagRepository::new(),
            MockTestContentExtractor::new(),
        )
    }

    fn service_with(
        repository: MockTestArticleRepository,
        tags: MockTestTagRepository,
        extractor: MockTestContentExtractor,
    ) -> TestService {
        ArticleService::new(Arc::new(repository), Arc::new(tags), Arc::new(extractor))
    }

    fn principal() -> Principal {
        Principal {
            auth_id: AuthenticationId::new(),
            user_id: UserId::new(),
            email: "editor@example.com".to_string(),
            roles: vec![Role::Admin],
        }
    }

    fn article(status: ArticleStatus, published_at: Option<DateTime<Utc>>) -> Article {
        let now = Utc::now();
        Article {
            id: ArticleId::new(),
            title: ArticleTitle::new("Shipping Rust".to_string()).unwrap(),
            slug: "shipping-rust".to_string(),
            content: ArticleContent::new("Body".to_string()).unwrap(),
            excerpt: None,
            image_url: None,
            category_id: CategoryId::new(),
            author_id: UserId::new(),
            status,
            views: 0,
            published_at,
            featured: None,
            source: None,
            category: None,
            author: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_command(status: ArticleStatus, publish_at: Option<DateTime<Utc>>) -> CreateArticleCommand {
        CreateArticleCommand {
            title: ArticleTitle::new("Shipping Rust".to_string()).unwrap(),
            content: ArticleContent::new("Body".to_string()).unwrap(),
            excerpt: None,
            image_url: None,
            category_id: CategoryId::new(),
            tag_ids: Vec::new(),
            status,
            publish_at,
        }
    }

    /// Article repository backed by a map, enough to follow an article
    /// through several service calls.
    fn stateful_repository(store: Arc<Mutex<HashMap<ArticleId, Article>>>) -> MockTestArticleRepository {
        let mut repository = MockTestArticleRepository::new();
        repository.expect_slug_exists().returning(|_| Ok(false));

        let created = Arc::clone(&store);
        repository.expect_create().returning(move |article, _| {
            created.lock().unwrap().insert(article.id, article.clone());
            Ok(article)
        });
        let found = Arc::clone(&store);
        repository
            .expect_find_by_id()
            .returning(move |id| Ok(found.lock().unwrap().get(id).cloned()));
        let updated = Arc::clone(&store);
        repository.expect_update_status().returning(move |id, change| {
            let mut store = updated.lock().unwrap();
            let article = store.get_mut(id).unwrap();
            article.status = change.status;
            article.published_at = change.published_at;
            Ok(article.clone())
        });

        repository
    }

    #[tokio::test]
    async fn test_scheduled_then_published_stamps_now() {
        let store = Arc::new(Mutex::new(HashMap::new()));
        let service = service(stateful_repository(Arc::clone(&store)));
        let publish_at = Utc::now() + Duration::days(7);

        let created = service
            .create_article(
                &principal(),
                create_command(ArticleStatus::Scheduled, Some(publish_at)),
            )
            .await
            .unwrap();
        assert_eq!(created.status, ArticleStatus::Scheduled);
        assert_eq!(created.published_at, Some(publish_at));

        let before = Utc::now();
        let published = service
            .update_article_status(
                &created.id,
                UpdateStatusCommand {
                    status: ArticleStatus::Published,
                    publish_at: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(published.status, ArticleStatus::Published);
        let published_at = published.published_at.unwrap();
        assert_ne!(published_at, publish_at);
        assert!(published_at >= before && published_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_schedule_without_date_is_rejected() {
        let mut repository = MockTestArticleRepository::new();
        repository.expect_create().times(0);

        let result = service(repository)
            .create_article(&principal(), create_command(ArticleStatus::Scheduled, None))
            .await;
        assert!(matches!(result, Err(ArticleError::PublishDateRequired)));
    }

    #[tokio::test]
    async fn test_published_cannot_return_to_draft() {
        let existing = article(ArticleStatus::Published, Some(Utc::now()));
        let id = existing.id;

        let mut repository = MockTestArticleRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_update_status().times(0);

        let result = service(repository)
            .update_article_status(
                &id,
                UpdateStatusCommand {
                    status: ArticleStatus::Draft,
                    publish_at: None,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(ArticleError::InvalidStatusTransition {
                from: ArticleStatus::Published,
                to: ArticleStatus::Draft
            })
        ));
    }

    #[tokio::test]
    async fn test_second_article_takes_featured_slot() {
        let first = article(ArticleStatus::Published, Some(Utc::now()));
        let second = article(ArticleStatus::Published, Some(Utc::now()));
        let articles: HashMap<ArticleId, Article> =
            [(first.id, first.clone()), (second.id, second.clone())].into();
        let slots = Arc::new(Mutex::new(FeaturedSlots::empty()));

        let mut repository = MockTestArticleRepository::new();
        let state = Arc::clone(&slots);
        repository
            .expect_update_featured_slots()
            .times(2)
            .returning(move |change| {
                let mut slots = state.lock().unwrap();
                slots.apply(change);
                Ok(*slots)
            });
        let state = Arc::clone(&slots);
        repository.expect_find_by_id().returning(move |id| {
            let mut article = articles.get(id).cloned();
            if let Some(article) = article.as_mut() {
                article.featured = state.lock().unwrap().position_of(id);
            }
            Ok(article)
        });

        let service = service(repository);
        let a = service.set_featured_position(&first.id, 1).await.unwrap();
        assert_eq!(a.featured.map(|p| p.value()), Some(1));

        let b = service.set_featured_position(&second.id, 1).await.unwrap();
        assert_eq!(b.featured.map(|p| p.value()), Some(1));

        let a = service.get_article(&first.id).await.unwrap();
        assert_eq!(a.featured, None);
    }

    #[tokio::test]
    async fn test_invalid_featured_position() {
        let mut repository = MockTestArticleRepository::new();
        repository.expect_update_featured_slots().times(0);

        let service = service(repository);
        for position in [0, 4, -1] {
            let result = service.set_featured_position(&ArticleId::new(), position).await;
            assert!(matches!(result, Err(ArticleError::InvalidPosition(p)) if p == position));
        }
    }

    #[tokio::test]
    async fn test_remove_featured_is_idempotent() {
        let existing = article(ArticleStatus::Published, Some(Utc::now()));
        let id = existing.id;

        let mut repository = MockTestArticleRepository::new();
        repository
            .expect_update_featured_slots()
            .times(2)
            .returning(|change| {
                let mut slots = FeaturedSlots::empty();
                assert!(!slots.apply(change));
                Ok(slots)
            });
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));

        let service = service(repository);
        for _ in 0..2 {
            let article = service.remove_featured_position(&id).await.unwrap();
            assert_eq!(article.featured, None);
        }
    }

    #[tokio::test]
    async fn test_unknown_tags_are_rejected() {
        let known = TagId::new();
        let unknown = TagId::new();

        let mut tags = MockTestTagRepository::new();
        tags.expect_find_by_ids().returning(move |_| {
            let now = Utc::now();
            Ok(vec![Tag {
                id: known,
                name: TagName::new("Rust".to_string()).unwrap(),
                slug: "rust".to_string(),
                created_at: now,
                updated_at: now,
            }])
        });
        let mut repository = MockTestArticleRepository::new();
        repository.expect_create().times(0);

        let mut command = create_command(ArticleStatus::Draft, None);
        command.tag_ids = vec![known, unknown, known];

        let result = service_with(repository, tags, MockTestContentExtractor::new())
            .create_article(&principal(), command)
            .await;

        match result {
            Err(ArticleError::UnknownTags(missing)) => assert_eq!(missing, unknown.to_string()),
            other => panic!("expected UnknownTags, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_regenerates_slug_and_keeps_views() {
        let mut existing = article(ArticleStatus::Draft, None);
        existing.views = 42;
        let id = existing.id;

        let mut repository = MockTestArticleRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_slug_exists()
            .returning(|slug| Ok(slug == "async-rust"));
        repository
            .expect_update()
            .withf(|article, tags| {
                article.slug == "async-rust-1" && article.views == 42 && tags.is_none()
            })
            .times(1)
            .returning(|article, _| Ok(article));

        let command = UpdateArticleCommand {
            title: ArticleTitle::new("Async Rust".to_string()).unwrap(),
            content: ArticleContent::new("New body".to_string()).unwrap(),
            excerpt: None,
            image_url: None,
            category_id: None,
            tag_ids: None,
            status: None,
            publish_at: None,
        };

        let updated = service(repository).update_article(&id, command).await.unwrap();
        assert_eq!(updated.status, ArticleStatus::Draft);
        assert_eq!(updated.published_at, None);
    }

    #[tokio::test]
    async fn test_ingest_falls_back_to_host_for_site_tag() {
        let mut extractor = MockTestContentExtractor::new();
        extractor.expect_extract().times(1).returning(|_| {
            Ok(ExtractedArticle {
                title: "t".repeat(300),
                content: "<p>Readable body</p>".to_string(),
                excerpt: Some("   ".to_string()),
                site_name: String::new(),
                image: Some("https://blog.example.com/cover.png".to_string()),
            })
        });

        let mut repository = MockTestArticleRepository::new();
        let author = principal();
        let author_id = author.user_id;
        repository
            .expect_create_external()
            .withf(move |draft| {
                draft.site_name == "blog.example.com"
                    && draft.title.as_str().chars().count() == ArticleTitle::MAX_LENGTH
                    && draft.excerpt.is_none()
                    && draft.source_url == "https://blog.example.com/posts/1"
                    && draft.author_id == author_id
            })
            .times(1)
            .returning(|draft| {
                let mut ingested = article(ArticleStatus::Published, Some(draft.published_at));
                ingested.id = draft.id;
                ingested.source = Some(draft.source_url);
                Ok(ingested)
            });

        let url = SourceUrl::new("https://blog.example.com/posts/1").unwrap();
        let article = service_with(repository, MockTestTagRepository::new(), extractor)
            .create_article_from_url(&author, url)
            .await
            .unwrap();

        assert_eq!(article.status, ArticleStatus::Published);
        assert_eq!(article.source.as_deref(), Some("https://blog.example.com/posts/1"));
    }

    #[tokio::test]
    async fn test_ingest_without_title_persists_nothing() {
        let mut extractor = MockTestContentExtractor::new();
        extractor.expect_extract().returning(|_| {
            Ok(ExtractedArticle {
                title: " ".to_string(),
                content: "Body".to_string(),
                excerpt: None,
                site_name: "Example".to_string(),
                image: None,
            })
        });
        let mut repository = MockTestArticleRepository::new();
        repository.expect_create_external().times(0);

        let url = SourceUrl::new("https://example.com/a").unwrap();
        let result = service_with(repository, MockTestTagRepository::new(), extractor)
            .create_article_from_url(&principal(), url)
            .await;

        assert!(matches!(result, Err(ArticleError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_delete_hands_slot_release_to_repository() {
        let id = ArticleId::new();

        let mut repository = MockTestArticleRepository::new();
        repository.expect_update_featured_slots().times(0);
        repository
            .expect_soft_delete()
            .withf(move |deleted| *deleted == id)
            .times(1)
            .returning(|_| Ok(()));

        service(repository).delete_article(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_hard_delete_of_missing_article() {
        let mut repository = MockTestArticleRepository::new();
        repository
            .expect_hard_delete()
            .times(1)
            .returning(|id| Err(ArticleError::NotFound(id.to_string())));

        let result = service(repository).hard_delete_article(&ArticleId::new()).await;

        assert!(matches!(result, Err(ArticleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rename_keeps_numbered_slug() {
        let mut existing = article(ArticleStatus::Draft, None);
        existing.title = ArticleTitle::new("Hello World (draft)".to_string()).unwrap();
        existing.slug = "hello-world-1".to_string();
        let id = existing.id;

        let mut repository = MockTestArticleRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_slug_exists().times(0);
        repository
            .expect_update()
            .withf(|article, _| article.slug == "hello-world-1")
            .times(1)
            .returning(|article, _| Ok(article));

        let command = UpdateArticleCommand {
            title: ArticleTitle::new("Hello World".to_string()).unwrap(),
            content: ArticleContent::new("Body".to_string()).unwrap(),
            excerpt: None,
            image_url: None,
            category_id: None,
            tag_ids: None,
            status: None,
            publish_at: None,
        };

        let updated = service(repository).update_article(&id, command).await.unwrap();
        assert_eq!(updated.title.as_str(), "Hello World");
    }

    #[tokio::test]
    async fn test_record_view_swallows_failures() {
        let mut repository = MockTestArticleRepository::new();
        repository
            .expect_increment_views()
            .times(1)
            .returning(|_| Err(ArticleError::DatabaseError("connection reset".to_string())));

        let handle = service(repository).record_view(ArticleId::new());
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_public_article_includes_related() {
        let main = article(ArticleStatus::Published, Some(Utc::now()));
        let related = article(ArticleStatus::Published, Some(Utc::now()));

        let mut repository = MockTestArticleRepository::new();
        let found = main.clone();
        repository
            .expect_find_published_by_slug()
            .withf(|slug| slug == "shipping-rust")
            .returning(move |_| Ok(Some(found.clone())));
        let returned = related.clone();
        repository
            .expect_find_related()
            .withf(|_, limit| *limit == RELATED_ARTICLES_LIMIT)
            .returning(move |_, _| Ok(vec![returned.clone()]));

        let public = service(repository)
            .get_public_article("shipping-rust")
            .await
            .unwrap();
        assert_eq!(public.article.id, main.id);
        assert_eq!(public.related, vec![related]);
    }

    #[tokio::test]
    async fn test_public_listing_ignores_status_filter() {
        let mut repository = MockTestArticleRepository::new();
        repository
            .expect_list()
            .withf(|query, scope| query.status.is_none() && *scope == ArticleScope::Published)
            .times(1)
            .returning(|query, _| Ok(Page::new(Vec::new(), 0, query.page)));

        let query = ListArticlesQuery {
            status: Some(ArticleStatus::Draft),
            ..Default::default()
        };
        let page = service(repository).list_public_articles(query).await.unwrap();
        assert!(page.items.is_empty());
    }
}
