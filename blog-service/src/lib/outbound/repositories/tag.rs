use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::search_pattern;
use super::unique_violation;
use crate::domain::pagination::Page;
use crate::domain::slug::SlugChecker;
use crate::domain::tag::errors::TagError;
use crate::domain::tag::models::ListTagsQuery;
use crate::domain::tag::models::Tag;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;
use crate::domain::tag::ports::TagRepository;

#[derive(sqlx::FromRow)]
struct TagRow {
    id: Uuid,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TagRow> for Tag {
    type Error = TagError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: TagId(row.id),
            name: TagName::new(row.name)?,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn write_error(e: sqlx::Error, tag: &Tag) -> TagError {
        if unique_violation(&e) == Some("tags_slug_key") {
            return TagError::SlugAlreadyExists(tag.slug.clone());
        }
        TagError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl SlugChecker for PostgresTagRepository {
    type Error = TagError;

    async fn slug_exists(&self, slug: &str) -> Result<bool, TagError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TagError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn create(&self, tag: Tag) -> Result<Tag, TagError> {
        sqlx::query(
            r#"
            INSERT INTO tags (id, name, slug, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(tag.id.0)
        .bind(tag.name.as_str())
        .bind(&tag.slug)
        .bind(tag.created_at)
        .bind(tag.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, &tag))?;

        Ok(tag)
    }

    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagError> {
        let row: Option<TagRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TagError::DatabaseError(e.to_string()))?;

        row.map(Tag::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows: Vec<TagRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tags
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TagError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Tag::try_from).collect()
    }

    async fn list(&self, query: &ListTagsQuery) -> Result<Page<Tag>, TagError> {
        let pattern = search_pattern(query.search.as_deref());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tags WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TagError::DatabaseError(e.to_string()))?;

        let rows: Vec<TagRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tags
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(query.page.limit())
        .bind(query.page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TagError::DatabaseError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(Tag::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total.max(0) as u64, query.page))
    }

    async fn update(&self, tag: Tag) -> Result<Tag, TagError> {
        let result = sqlx::query(
            r#"
            UPDATE tags
            SET name = $2, slug = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(tag.id.0)
        .bind(tag.name.as_str())
        .bind(&tag.slug)
        .bind(tag.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, &tag))?;

        if result.rows_affected() == 0 {
            return Err(TagError::NotFound(tag.id.to_string()));
        }

        Ok(tag)
    }

    async fn delete(&self, id: &TagId) -> Result<(), TagError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| TagError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TagError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
