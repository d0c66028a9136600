use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::search_pattern;
use crate::domain::demo::errors::DemoError;
use crate::domain::demo::models::DemoEntry;
use crate::domain::demo::models::DemoEntryId;
use crate::domain::demo::models::DemoText;
use crate::domain::demo::models::ListDemosQuery;
use crate::domain::demo::models::PhoneNumber;
use crate::domain::demo::ports::DemoRepository;
use crate::domain::pagination::Page;
use crate::domain::user::models::EmailAddress;

#[derive(sqlx::FromRow)]
struct DemoRow {
    id: Uuid,
    name: String,
    brand: String,
    phone: String,
    email: Option<String>,
    preferred_time: String,
    scheduled_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DemoRow> for DemoEntry {
    type Error = DemoError;

    fn try_from(row: DemoRow) -> Result<Self, Self::Error> {
        Ok(DemoEntry {
            id: DemoEntryId(row.id),
            name: DemoText::new("name", row.name, DemoText::NAME_MAX_LENGTH)?,
            brand: DemoText::new("brand", row.brand, DemoText::NAME_MAX_LENGTH)?,
            phone: PhoneNumber::new(row.phone)?,
            email: row.email.map(EmailAddress::new).transpose()?,
            preferred_time: DemoText::new(
                "preferred_time",
                row.preferred_time,
                DemoText::TIME_MAX_LENGTH,
            )?,
            scheduled_date: row.scheduled_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PostgresDemoRepository {
    pool: PgPool,
}

impl PostgresDemoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DemoRepository for PostgresDemoRepository {
    async fn create(&self, entry: DemoEntry) -> Result<DemoEntry, DemoError> {
        sqlx::query(
            r#"
            INSERT INTO demos
                (id, name, brand, phone, email, preferred_time, scheduled_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id.0)
        .bind(entry.name.as_str())
        .bind(entry.brand.as_str())
        .bind(entry.phone.as_str())
        .bind(entry.email.as_ref().map(|e| e.as_str()))
        .bind(entry.preferred_time.as_str())
        .bind(entry.scheduled_date)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DemoError::DatabaseError(e.to_string()))?;

        Ok(entry)
    }

    async fn find_by_id(&self, id: &DemoEntryId) -> Result<Option<DemoEntry>, DemoError> {
        let row: Option<DemoRow> = sqlx::query_as(
            r#"
            SELECT id, name, brand, phone, email, preferred_time, scheduled_date,
                   created_at, updated_at
            FROM demos
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DemoError::DatabaseError(e.to_string()))?;

        row.map(DemoEntry::try_from).transpose()
    }

    async fn list(&self, query: &ListDemosQuery) -> Result<Page<DemoEntry>, DemoError> {
        let pattern = search_pattern(query.search.as_deref());

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM demos WHERE ($1::TEXT IS NULL OR name ILIKE $1)")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DemoError::DatabaseError(e.to_string()))?;

        let rows: Vec<DemoRow> = sqlx::query_as(
            r#"
            SELECT id, name, brand, phone, email, preferred_time, scheduled_date,
                   created_at, updated_at
            FROM demos
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(query.page.limit())
        .bind(query.page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DemoError::DatabaseError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(DemoEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total.max(0) as u64, query.page))
    }

    async fn update(&self, entry: DemoEntry) -> Result<DemoEntry, DemoError> {
        let result = sqlx::query(
            r#"
            UPDATE demos
            SET name = $2, brand = $3, phone = $4, email = $5, preferred_time = $6,
                scheduled_date = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(entry.id.0)
        .bind(entry.name.as_str())
        .bind(entry.brand.as_str())
        .bind(entry.phone.as_str())
        .bind(entry.email.as_ref().map(|e| e.as_str()))
        .bind(entry.preferred_time.as_str())
        .bind(entry.scheduled_date)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DemoError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DemoError::NotFound(entry.id.to_string()));
        }

        Ok(entry)
    }

    async fn delete(&self, id: &DemoEntryId) -> Result<(), DemoError> {
        let result = sqlx::query("DELETE FROM demos WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| DemoError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DemoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
