use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgConnection;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::is_foreign_key_violation;
use super::search_pattern;
use super::unique_violation;
use crate::domain::article::errors::ArticleError;
use crate::domain::article::featured::FeaturedSlotChange;
use crate::domain::article::featured::FeaturedSlots;
use crate::domain::article::lifecycle::StatusChange;
use crate::domain::article::models::Article;
use crate::domain::article::models::ArticleContent;
use crate::domain::article::models::ArticleId;
use crate::domain::article::models::ArticleScope;
use crate::domain::article::models::ArticleStats;
use crate::domain::article::models::ArticleStatus;
use crate::domain::article::models::ArticleTitle;
use crate::domain::article::models::AuthorSummary;
use crate::domain::article::models::CategorySummary;
use crate::domain::article::models::Excerpt;
use crate::domain::article::models::ExternalArticleDraft;
use crate::domain::article::models::FeaturedPosition;
use crate::domain::article::models::ListArticlesQuery;
use crate::domain::article::models::SortField;
use crate::domain::article::models::SortOrder;
use crate::domain::article::models::TagSummary;
use crate::domain::article::ports::ArticleRepository;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::EXTERNAL_CATEGORY_NAME;
use crate::domain::pagination::Page;
use crate::domain::slug;
use crate::domain::slug::SlugChecker;
use crate::domain::tag::models::TagId;
use crate::domain::user::models::UserId;

/// Advisory lock key serialising every featured-slot mutation.
const FEATURED_SLOTS_LOCK: i64 = 0x0F3A_7055;

const SELECT_ARTICLE: &str = r#"
    SELECT a.id, a.title, a.slug, a.content, a.excerpt, a.image_url, a.category_id,
           a.author_id, a.status, a.views, a.published_at, a.featured, a.source,
           a.created_at, a.updated_at,
           c.name AS category_name, c.slug AS category_slug, u.name AS author_name
    FROM articles a
    LEFT JOIN categories c ON c.id = a.category_id
    LEFT JOIN users u ON u.id = a.author_id
"#;

const PUBLISHED: &str = "a.status = 'published' AND a.published_at <= NOW()";

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    slug: String,
    content: String,
    excerpt: Option<String>,
    image_url: Option<String>,
    category_id: Uuid,
    author_id: Uuid,
    status: String,
    views: i64,
    published_at: Option<DateTime<Utc>>,
    featured: Option<i16>,
    source: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: Option<String>,
    category_slug: Option<String>,
    author_name: Option<String>,
}

impl ArticleRow {
    fn into_article(self, tags: Vec<TagSummary>) -> Result<Article, ArticleError> {
        let category = match (self.category_name, self.category_slug) {
            (Some(name), Some(slug)) => Some(CategorySummary {
                id: CategoryId(self.category_id),
                name,
                slug,
            }),
            _ => None,
        };
        let author = self.author_name.map(|name| AuthorSummary {
            id: UserId(self.author_id),
            name,
        });

        Ok(Article {
            id: ArticleId(self.id),
            title: ArticleTitle::new(self.title)?,
            slug: self.slug,
            content: ArticleContent::new(self.content)?,
            excerpt: self.excerpt.map(Excerpt::new).transpose()?,
            image_url: self.image_url,
            category_id: CategoryId(self.category_id),
            author_id: UserId(self.author_id),
            status: self.status.parse::<ArticleStatus>()?,
            views: self.views,
            published_at: self.published_at,
            featured: self
                .featured
                .map(|position| FeaturedPosition::new(i64::from(position)))
                .transpose()?,
            source: self.source,
            category,
            author,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TagLinkRow {
    article_id: Uuid,
    id: Uuid,
    name: String,
    slug: String,
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    total_articles: i64,
    published_articles: i64,
    draft_articles: i64,
    total_views: i64,
}

fn db_error(e: sqlx::Error) -> ArticleError {
    ArticleError::DatabaseError(e.to_string())
}

pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn write_error(e: sqlx::Error, article_slug: &str, category_id: &CategoryId) -> ArticleError {
        if unique_violation(&e) == Some("articles_slug_key") {
            return ArticleError::SlugAlreadyExists(article_slug.to_string());
        }
        if is_foreign_key_violation(&e) {
            return ArticleError::CategoryNotFound(category_id.to_string());
        }
        db_error(e)
    }

    /// Attach tag summaries to freshly read rows, preserving row order.
    async fn hydrate(&self, rows: Vec<ArticleRow>) -> Result<Vec<Article>, ArticleError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let links: Vec<TagLinkRow> = sqlx::query_as(
            r#"
            SELECT at.article_id, t.id, t.name, t.slug
            FROM article_tags at
            JOIN tags t ON t.id = at.tag_id
            WHERE at.article_id = ANY($1)
            ORDER BY t.name ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut tags: HashMap<Uuid, Vec<TagSummary>> = HashMap::new();
        for link in links {
            tags.entry(link.article_id).or_default().push(TagSummary {
                id: TagId(link.id),
                name: link.name,
                slug: link.slug,
            });
        }

        rows.into_iter()
            .map(|row| {
                let article_tags = tags.remove(&row.id).unwrap_or_default();
                row.into_article(article_tags)
            })
            .collect()
    }

    async fn hydrate_one(&self, row: Option<ArticleRow>) -> Result<Option<Article>, ArticleError> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn load(&self, id: &ArticleId) -> Result<Article, ArticleError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ArticleError::NotFound(id.to_string()))
    }

    async fn link_tags(
        conn: &mut PgConnection,
        article_id: &ArticleId,
        tag_ids: &[Uuid],
    ) -> Result<(), ArticleError> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO article_tags (article_id, tag_id)
            SELECT $1, UNNEST($2::UUID[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(article_id.0)
        .bind(tag_ids)
        .execute(conn)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return ArticleError::UnknownTags(
                    tag_ids
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                );
            }
            db_error(e)
        })?;

        Ok(())
    }

    async fn replace_links(
        conn: &mut PgConnection,
        article_id: &ArticleId,
        tag_ids: &[Uuid],
    ) -> Result<(), ArticleError> {
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article_id.0)
            .execute(&mut *conn)
            .await
            .map_err(db_error)?;

        Self::link_tags(conn, article_id, tag_ids).await
    }

    /// Find-or-create a category or tag row by slug and return its id.
    async fn upsert_named(
        conn: &mut PgConnection,
        table: &str,
        name: &str,
    ) -> Result<Uuid, ArticleError> {
        let slug = slug::slugify(name);

        sqlx::query(&format!(
            "INSERT INTO {} (id, name, slug) VALUES ($1, $2, $3) ON CONFLICT (slug) DO NOTHING",
            table
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&slug)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

        sqlx::query_scalar(&format!("SELECT id FROM {} WHERE slug = $1", table))
            .bind(&slug)
            .fetch_one(&mut *conn)
            .await
            .map_err(db_error)
    }

    /// Slug generation inside a transaction, mirroring
    /// [`slug::generate_unique_slug`].
    async fn unique_slug(conn: &mut PgConnection, title: &str) -> Result<String, ArticleError> {
        let base = slug::slugify(title);

        for candidate in slug::candidates(&base) {
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1)")
                    .bind(&candidate)
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(db_error)?;
            if !taken {
                return Ok(candidate);
            }
        }

        Ok(slug::random_suffixed(&base))
    }

    /// Serialise featured-slot mutations until the transaction ends.
    async fn lock_featured_slots(conn: &mut PgConnection) -> Result<(), ArticleError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(FEATURED_SLOTS_LOCK)
            .execute(conn)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    /// Recompute the slots with `change` applied and write back only the rows
    /// that moved. Callers hold [`Self::lock_featured_slots`].
    async fn rewrite_featured_slots(
        conn: &mut PgConnection,
        change: FeaturedSlotChange,
    ) -> Result<FeaturedSlots, ArticleError> {
        let rows: Vec<(Uuid, i16)> = sqlx::query_as(
            r#"
            SELECT id, featured
            FROM articles
            WHERE featured IS NOT NULL AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error)?;

        let assignments = rows
            .into_iter()
            .map(|(id, position)| Ok((ArticleId(id), FeaturedPosition::new(i64::from(position))?)))
            .collect::<Result<Vec<_>, ArticleError>>()?;

        let before = FeaturedSlots::from_assignments(assignments);
        let mut after = before;
        after.apply(change);

        let diff = after.diff(&before);

        // Clear every moving row first so the unique slot index never sees
        // two rows on one position.
        for (id, _) in &diff {
            sqlx::query("UPDATE articles SET featured = NULL WHERE id = $1")
                .bind(id.0)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?;
        }
        for (id, position) in &diff {
            if let Some(position) = position {
                sqlx::query("UPDATE articles SET featured = $2 WHERE id = $1")
                    .bind(id.0)
                    .bind(i16::from(position.value()))
                    .execute(&mut *conn)
                    .await
                    .map_err(db_error)?;
            }
        }

        Ok(after)
    }

    fn push_filters(
        builder: &mut QueryBuilder<'_, Postgres>,
        query: &ListArticlesQuery,
        scope: ArticleScope,
    ) {
        builder.push(" WHERE a.deleted_at IS NULL");

        if scope == ArticleScope::Published {
            builder.push(" AND ").push(PUBLISHED);
        }
        if let Some(category_id) = query.category_id {
            builder.push(" AND a.category_id = ").push_bind(category_id.0);
        }
        if let Some(tag_id) = query.tag_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM article_tags x WHERE x.article_id = a.id AND x.tag_id = ")
                .push_bind(tag_id.0)
                .push(")");
        }
        if let Some(status) = query.status {
            builder.push(" AND a.status = ").push_bind(status.as_str());
        }
        if let Some(pattern) = search_pattern(query.search.as_deref()) {
            builder
                .push(" AND (a.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(start) = query.start_date {
            builder.push(" AND a.created_at >= ").push_bind(start);
        }
        if let Some(end) = query.end_date {
            builder.push(" AND a.created_at <= ").push_bind(end);
        }
    }

    fn order_by(query: &ListArticlesQuery) -> String {
        let column = match query.sort.field {
            SortField::CreatedAt => "a.created_at",
            SortField::PublishedAt => "a.published_at",
            SortField::Views => "a.views",
            SortField::Title => "a.title",
        };
        let direction = match query.sort.order {
            SortOrder::Asc => "ASC NULLS LAST",
            SortOrder::Desc => "DESC NULLS LAST",
        };
        format!(" ORDER BY {} {}, a.id ASC", column, direction)
    }
}

#[async_trait]
impl SlugChecker for PostgresArticleRepository {
    type Error = ArticleError;

    async fn slug_exists(&self, slug: &str) -> Result<bool, ArticleError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn create(&self, article: Article, tag_ids: Vec<TagId>) -> Result<Article, ArticleError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO articles
                (id, title, slug, content, excerpt, image_url, category_id, author_id,
                 status, views, published_at, source, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10, $11, $12, $13)
            "#,
        )
        .bind(article.id.0)
        .bind(article.title.as_str())
        .bind(&article.slug)
        .bind(article.content.as_str())
        .bind(article.excerpt.as_ref().map(|e| e.as_str()))
        .bind(&article.image_url)
        .bind(article.category_id.0)
        .bind(article.author_id.0)
        .bind(article.status.as_str())
        .bind(article.published_at)
        .bind(&article.source)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::write_error(e, &article.slug, &article.category_id))?;

        let tag_ids: Vec<Uuid> = tag_ids.iter().map(|id| id.0).collect();
        Self::link_tags(&mut tx, &article.id, &tag_ids).await?;

        tx.commit().await.map_err(db_error)?;

        self.load(&article.id).await
    }

    async fn create_external(&self, draft: ExternalArticleDraft) -> Result<Article, ArticleError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let category_id = Self::upsert_named(&mut tx, "categories", EXTERNAL_CATEGORY_NAME).await?;
        let tag_id = Self::upsert_named(&mut tx, "tags", &draft.site_name).await?;
        let slug = Self::unique_slug(&mut tx, draft.title.as_str()).await?;

        sqlx::query(
            r#"
            INSERT INTO articles
                (id, title, slug, content, excerpt, image_url, category_id, author_id,
                 status, views, published_at, source, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'published', 0, $9, $10, $9, $9)
            "#,
        )
        .bind(draft.id.0)
        .bind(draft.title.as_str())
        .bind(&slug)
        .bind(draft.content.as_str())
        .bind(draft.excerpt.as_ref().map(|e| e.as_str()))
        .bind(&draft.image_url)
        .bind(category_id)
        .bind(draft.author_id.0)
        .bind(draft.published_at)
        .bind(&draft.source_url)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::write_error(e, &slug, &CategoryId(category_id)))?;

        Self::link_tags(&mut tx, &draft.id, &[tag_id]).await?;

        tx.commit().await.map_err(db_error)?;

        self.load(&draft.id).await
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticleError> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "{} WHERE a.id = $1 AND a.deleted_at IS NULL",
            SELECT_ARTICLE
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        self.hydrate_one(row).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleError> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "{} WHERE a.slug = $1 AND a.deleted_at IS NULL",
            SELECT_ARTICLE
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        self.hydrate_one(row).await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleError> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "{} WHERE a.slug = $1 AND a.deleted_at IS NULL AND {}",
            SELECT_ARTICLE, PUBLISHED
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        self.hydrate_one(row).await
    }

    async fn find_related(
        &self,
        article: &Article,
        limit: i64,
    ) -> Result<Vec<Article>, ArticleError> {
        let tag_ids: Vec<Uuid> = article.tags.iter().map(|tag| tag.id.0).collect();

        let rows: Vec<ArticleRow> = sqlx::query_as(&format!(
            r#"{} WHERE a.deleted_at IS NULL AND {} AND a.id <> $1
               AND (a.category_id = $2 OR EXISTS (
                   SELECT 1 FROM article_tags x WHERE x.article_id = a.id AND x.tag_id = ANY($3)
               ))
               ORDER BY a.published_at DESC
               LIMIT $4"#,
            SELECT_ARTICLE, PUBLISHED
        ))
        .bind(article.id.0)
        .bind(article.category_id.0)
        .bind(&tag_ids)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.hydrate(rows).await
    }

    async fn list(
        &self,
        query: &ListArticlesQuery,
        scope: ArticleScope,
    ) -> Result<Page<Article>, ArticleError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles a");
        Self::push_filters(&mut count, query, scope);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_ARTICLE);
        Self::push_filters(&mut select, query, scope);
        select.push(Self::order_by(query));
        select
            .push(" LIMIT ")
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let rows: Vec<ArticleRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let items = self.hydrate(rows).await?;
        Ok(Page::new(items, total.max(0) as u64, query.page))
    }

    async fn list_featured(&self) -> Result<Vec<Article>, ArticleError> {
        let rows: Vec<ArticleRow> = sqlx::query_as(&format!(
            "{} WHERE a.deleted_at IS NULL AND a.featured IS NOT NULL AND {} ORDER BY a.featured ASC",
            SELECT_ARTICLE, PUBLISHED
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        self.hydrate(rows).await
    }

    async fn stats(&self) -> Result<ArticleStats, ArticleError> {
        let row: StatsRow = sqlx::query_as(
            r#"
            SELECT COUNT(*) AS total_articles,
                   COUNT(*) FILTER (WHERE status = 'published') AS published_articles,
                   COUNT(*) FILTER (WHERE status = 'draft') AS draft_articles,
                   COALESCE(SUM(views), 0)::BIGINT AS total_views
            FROM articles
            WHERE deleted_at IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(ArticleStats {
            total_articles: row.total_articles,
            published_articles: row.published_articles,
            draft_articles: row.draft_articles,
            total_views: row.total_views,
        })
    }

    async fn update(
        &self,
        article: Article,
        tag_ids: Option<Vec<TagId>>,
    ) -> Result<Article, ArticleError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = $2, slug = $3, content = $4, excerpt = $5, image_url = $6,
                category_id = $7, status = $8, published_at = $9, updated_at = $10
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(article.id.0)
        .bind(article.title.as_str())
        .bind(&article.slug)
        .bind(article.content.as_str())
        .bind(article.excerpt.as_ref().map(|e| e.as_str()))
        .bind(&article.image_url)
        .bind(article.category_id.0)
        .bind(article.status.as_str())
        .bind(article.published_at)
        .bind(article.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::write_error(e, &article.slug, &article.category_id))?;

        if result.rows_affected() == 0 {
            return Err(ArticleError::NotFound(article.id.to_string()));
        }

        if let Some(tag_ids) = tag_ids {
            let tag_ids: Vec<Uuid> = tag_ids.iter().map(|id| id.0).collect();
            Self::replace_links(&mut tx, &article.id, &tag_ids).await?;
        }

        tx.commit().await.map_err(db_error)?;

        self.load(&article.id).await
    }

    async fn update_status(
        &self,
        id: &ArticleId,
        change: StatusChange,
    ) -> Result<Article, ArticleError> {
        let result = sqlx::query(
            r#"
            UPDATE articles
            SET status = $2, published_at = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .bind(change.status.as_str())
        .bind(change.published_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ArticleError::NotFound(id.to_string()));
        }

        self.load(id).await
    }

    async fn replace_tags(
        &self,
        id: &ArticleId,
        tag_ids: Vec<TagId>,
    ) -> Result<Article, ArticleError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            "UPDATE articles SET updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ArticleError::NotFound(id.to_string()));
        }

        let tag_ids: Vec<Uuid> = tag_ids.iter().map(|id| id.0).collect();
        Self::replace_links(&mut tx, id, &tag_ids).await?;

        tx.commit().await.map_err(db_error)?;

        self.load(id).await
    }

    async fn update_featured_slots(
        &self,
        change: FeaturedSlotChange,
    ) -> Result<FeaturedSlots, ArticleError> {
        let article_id = change.article_id();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        Self::lock_featured_slots(&mut tx).await?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(article_id.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        if !exists {
            return Err(ArticleError::NotFound(article_id.to_string()));
        }

        let slots = Self::rewrite_featured_slots(&mut tx, change).await?;

        tx.commit().await.map_err(db_error)?;

        Ok(slots)
    }

    async fn increment_views(&self, id: &ArticleId) -> Result<(), ArticleError> {
        sqlx::query("UPDATE articles SET views = views + 1 WHERE id = $1 AND deleted_at IS NULL")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn soft_delete(&self, id: &ArticleId) -> Result<(), ArticleError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        Self::lock_featured_slots(&mut tx).await?;
        Self::rewrite_featured_slots(&mut tx, FeaturedSlotChange::Remove { article_id: *id })
            .await?;

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ArticleError::NotFound(id.to_string()));
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn hard_delete(&self, id: &ArticleId) -> Result<(), ArticleError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        Self::lock_featured_slots(&mut tx).await?;
        Self::rewrite_featured_slots(&mut tx, FeaturedSlotChange::Remove { article_id: *id })
            .await?;

        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ArticleError::NotFound(id.to_string()));
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }
}
