use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::domain::article::errors::ArticleError;
use crate::domain::article::featured::FeaturedSlotChange;
use crate::domain::article::featured::FeaturedSlots;
use crate::domain::article::lifecycle::StatusChange;
use crate::domain::article::models::Article;
use crate::domain::article::models::ArticleId;
use crate::domain::article::models::ArticleScope;
use crate::domain::article::models::ArticleStats;
use crate::domain::article::models::CreateArticleCommand;
use crate::domain::article::models::ExternalArticleDraft;
use crate::domain::article::models::ExtractedArticle;
use crate::domain::article::models::ListArticlesQuery;
use crate::domain::article::models::PublicArticle;
use crate::domain::article::models::SourceUrl;
use crate::domain::article::models::UpdateArticleCommand;
use crate::domain::article::models::UpdateStatusCommand;
use crate::domain::pagination::Page;
use crate::domain::principal::Principal;
use crate::domain::slug::SlugChecker;
use crate::domain::tag::models::TagId;

/// Port for article domain operations.
///
/// Admin operations see every non-deleted article; the `public` operations
/// only see published articles whose publish date has passed.
#[async_trait]
pub trait ArticleServicePort: Send + Sync + 'static {
    /// Create an article authored by the principal.
    ///
    /// # Errors
    /// * `PublishDateRequired` - Scheduled without `publish_at`
    /// * `UnknownTags` - One of the tag ids does not exist
    /// * `CategoryNotFound` - Category does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create_article(
        &self,
        principal: &Principal,
        command: CreateArticleCommand,
    ) -> Result<Article, ArticleError>;

    /// Ingest an external page as a published article.
    ///
    /// # Errors
    /// * `FetchFailed` - The page could not be fetched or had no readable content
    async fn create_article_from_url(
        &self,
        principal: &Principal,
        url: SourceUrl,
    ) -> Result<Article, ArticleError>;

    async fn update_article(
        &self,
        id: &ArticleId,
        command: UpdateArticleCommand,
    ) -> Result<Article, ArticleError>;

    /// # Errors
    /// * `InvalidStatusTransition` - Published or archived back to draft/scheduled
    /// * `PublishDateRequired` - Scheduled without a date
    async fn update_article_status(
        &self,
        id: &ArticleId,
        command: UpdateStatusCommand,
    ) -> Result<Article, ArticleError>;

    async fn update_article_tags(
        &self,
        id: &ArticleId,
        tag_ids: Vec<TagId>,
    ) -> Result<Article, ArticleError>;

    /// Move the article into a featured slot.
    ///
    /// # Errors
    /// * `InvalidPosition` - Position outside 1..=3
    /// * `NotFound` - Article does not exist
    async fn set_featured_position(
        &self,
        id: &ArticleId,
        position: i64,
    ) -> Result<Article, ArticleError>;

    /// Take the article out of the featured slots. No-op when it holds none.
    async fn remove_featured_position(&self, id: &ArticleId) -> Result<Article, ArticleError>;

    async fn get_article(&self, id: &ArticleId) -> Result<Article, ArticleError>;

    async fn get_article_by_slug(&self, slug: &str) -> Result<Article, ArticleError>;

    async fn list_articles(&self, query: ListArticlesQuery)
        -> Result<Page<Article>, ArticleError>;

    async fn article_stats(&self) -> Result<ArticleStats, ArticleError>;

    async fn list_public_articles(
        &self,
        query: ListArticlesQuery,
    ) -> Result<Page<Article>, ArticleError>;

    async fn get_public_article(&self, slug: &str) -> Result<PublicArticle, ArticleError>;

    async fn featured_articles(&self) -> Result<Vec<Article>, ArticleError>;

    /// Bump the view counter in a detached task.
    ///
    /// Best effort: failures are logged and dropped. Callers may await the
    /// handle or ignore it.
    fn record_view(&self, id: ArticleId) -> JoinHandle<()>;

    /// Soft delete. The article also gives up its featured slot.
    async fn delete_article(&self, id: &ArticleId) -> Result<(), ArticleError>;

    /// Remove the row and its tag associations.
    async fn hard_delete_article(&self, id: &ArticleId) -> Result<(), ArticleError>;
}

/// Persistence for articles. Every read skips soft-deleted rows.
#[async_trait]
pub trait ArticleRepository: SlugChecker<Error = ArticleError> + 'static {
    /// Insert the article and link its tags in one transaction.
    async fn create(&self, article: Article, tag_ids: Vec<TagId>)
        -> Result<Article, ArticleError>;

    /// Find-or-create the external category and site tag, then insert the
    /// article with a unique slug, all in one transaction.
    async fn create_external(&self, draft: ExternalArticleDraft)
        -> Result<Article, ArticleError>;

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleError>;

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleError>;

    /// Published articles sharing the category or a tag, newest first.
    async fn find_related(&self, article: &Article, limit: i64)
        -> Result<Vec<Article>, ArticleError>;

    async fn list(
        &self,
        query: &ListArticlesQuery,
        scope: ArticleScope,
    ) -> Result<Page<Article>, ArticleError>;

    /// Published featured articles ordered by position.
    async fn list_featured(&self) -> Result<Vec<Article>, ArticleError>;

    async fn stats(&self) -> Result<ArticleStats, ArticleError>;

    /// Write the editable columns; tags are replaced when `tag_ids` is set.
    /// `views`, `featured` and `created_at` are never written.
    async fn update(
        &self,
        article: Article,
        tag_ids: Option<Vec<TagId>>,
    ) -> Result<Article, ArticleError>;

    async fn update_status(
        &self,
        id: &ArticleId,
        change: StatusChange,
    ) -> Result<Article, ArticleError>;

    async fn replace_tags(
        &self,
        id: &ArticleId,
        tag_ids: Vec<TagId>,
    ) -> Result<Article, ArticleError>;

    /// Apply a slot change under a lock on the featured rows and return the
    /// resulting slots.
    ///
    /// # Errors
    /// * `NotFound` - Article does not exist
    async fn update_featured_slots(
        &self,
        change: FeaturedSlotChange,
    ) -> Result<FeaturedSlots, ArticleError>;

    async fn increment_views(&self, id: &ArticleId) -> Result<(), ArticleError>;

    /// Mark the row deleted and release its featured slot, compacting the
    /// remaining slots in the same transaction.
    ///
    /// # Errors
    /// * `NotFound` - Article does not exist or is already deleted
    async fn soft_delete(&self, id: &ArticleId) -> Result<(), ArticleError>;

    /// Remove the row and its tag links, compacting the featured slots in
    /// the same transaction.
    async fn hard_delete(&self, id: &ArticleId) -> Result<(), ArticleError>;
}

/// Pulls readable content out of a web page.
#[async_trait]
pub trait ContentExtractor: Send + Sync + 'static {
    /// # Errors
    /// * `FetchFailed` - Network failure, non-success status or unreadable page
    async fn extract(&self, url: &SourceUrl) -> Result<ExtractedArticle, ArticleError>;
}
