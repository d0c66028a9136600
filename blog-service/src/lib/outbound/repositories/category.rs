use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::is_foreign_key_violation;
use super::search_pattern;
use super::unique_violation;
use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::domain::category::models::ListCategoriesQuery;
use crate::domain::category::ports::CategoryRepository;
use crate::domain::pagination::Page;
use crate::domain::slug::SlugChecker;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = CategoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: CategoryId(row.id),
            name: CategoryName::new(row.name)?,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn write_error(e: sqlx::Error, category: &Category) -> CategoryError {
        if unique_violation(&e) == Some("categories_slug_key") {
            return CategoryError::SlugAlreadyExists(category.slug.clone());
        }
        CategoryError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl SlugChecker for PostgresCategoryRepository {
    type Error = CategoryError;

    async fn slug_exists(&self, slug: &str) -> Result<bool, CategoryError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CategoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: Category) -> Result<Category, CategoryError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id.0)
        .bind(category.name.as_str())
        .bind(&category.slug)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, &category))?;

        Ok(category)
    }

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        row.map(Category::try_from).transpose()
    }

    async fn list(&self, query: &ListCategoriesQuery) -> Result<Page<Category>, CategoryError> {
        let pattern = search_pattern(query.search.as_deref());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM categories
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
        .map_err(|e| CategoryError::DatabaseError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total.max(0) as u64, query.page))
    }

    async fn update(&self, category: Category) -> Result<Category, CategoryError> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, slug = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(category.id.0)
        .bind(category.name.as_str())
        .bind(&category.slug)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, &category))?;

        if result.rows_affected() == 0 {
            return Err(CategoryError::NotFound(category.id.to_string()));
        }

        Ok(category)
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return CategoryError::InUse(id.to_string());
                }
                CategoryError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(CategoryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
