use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::demo::errors::DemoError;
use crate::domain::demo::models::DemoCommand;
use crate::domain::demo::models::DemoEntry;
use crate::domain::demo::models::DemoEntryId;
use crate::domain::demo::models::ListDemosQuery;
use crate::domain::demo::ports::DemoRepository;
use crate::domain::demo::ports::DemoServicePort;
use crate::domain::pagination::Page;

pub struct DemoService<DR>
where
    DR: DemoRepository,
{
    repository: Arc<DR>,
}

impl<DR> DemoService<DR>
where
    DR: DemoRepository,
{
    pub fn new(repository: Arc<DR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<DR> DemoServicePort for DemoService<DR>
where
    DR: DemoRepository,
{
    async fn create_demo(&self, command: DemoCommand) -> Result<DemoEntry, DemoError> {
        let now = Utc::now();
        let entry = self
            .repository
            .create(DemoEntry {
                id: DemoEntryId::new(),
                name: command.name,
                brand: command.brand,
                phone: command.phone,
                email: command.email,
                preferred_time: command.preferred_time,
                scheduled_date: command.scheduled_date,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(demo_id = %entry.id, date = %entry.scheduled_date, "Demo requested");
        Ok(entry)
    }

    async fn get_demo(&self, id: &DemoEntryId) -> Result<DemoEntry, DemoError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(DemoError::NotFound(id.to_string()))
    }

    async fn list_demos(&self, query: ListDemosQuery) -> Result<Page<DemoEntry>, DemoError> {
        self.repository.list(&query).await
    }

    async fn update_demo(
        &self,
        id: &DemoEntryId,
        command: DemoCommand,
    ) -> Result<DemoEntry, DemoError> {
        let mut entry = self.get_demo(id).await?;

        entry.name = command.name;
        entry.brand = command.brand;
        entry.phone = command.phone;
        entry.email = command.email;
        entry.preferred_time = command.preferred_time;
        entry.scheduled_date = command.scheduled_date;
        entry.updated_at = Utc::now();

        self.repository.update(entry).await
    }

    async fn delete_demo(&self, id: &DemoEntryId) -> Result<(), DemoError> {
        self.repository.delete(id).await?;
        tracing::info!(demo_id = %id, "Demo request deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::mock;

    use super::*;
    use crate::domain::demo::models::DemoText;
    use crate::domain::demo::models::PhoneNumber;

    mock! {
        pub TestDemoRepository {}

        #[async_trait]
        impl DemoRepository for TestDemoRepository {
            async fn create(&self, entry: DemoEntry) -> Result<DemoEntry, DemoError>;
            async fn find_by_id(&self, id: &DemoEntryId) -> Result<Option<DemoEntry>, DemoError>;
            async fn list(&self, query: &ListDemosQuery) -> Result<Page<DemoEntry>, DemoError>;
            async fn update(&self, entry: DemoEntry) -> Result<DemoEntry, DemoError>;
            async fn delete(&self, id: &DemoEntryId) -> Result<(), DemoError>;
        }
    }

    fn command(name: &str, date: NaiveDate) -> DemoCommand {
        DemoCommand {
            name: DemoText::new("name", name.to_string(), 255).unwrap(),
            brand: DemoText::new("brand", "Kopi Nusantara".to_string(), 255).unwrap(),
            phone: PhoneNumber::new("+62 812 3456 7890".to_string()).unwrap(),
            email: None,
            preferred_time: DemoText::new("preferred_time", "morning".to_string(), 64).unwrap(),
            scheduled_date: date,
        }
    }

    #[tokio::test]
    async fn test_create_demo() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        let mut repository = MockTestDemoRepository::new();
        repository
            .expect_create()
            .withf(move |entry| entry.name.as_str() == "Ana" && entry.scheduled_date == date)
            .times(1)
            .returning(Ok);

        let service = DemoService::new(Arc::new(repository));
        let entry = service.create_demo(command("Ana", date)).await.unwrap();
        assert_eq!(entry.brand.as_str(), "Kopi Nusantara");
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_created_at() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let moved = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let now = Utc::now();
        let c = command("Ana", date);
        let existing = DemoEntry {
            id: DemoEntryId::new(),
            name: c.name,
            brand: c.brand,
            phone: c.phone,
            email: c.email,
            preferred_time: c.preferred_time,
            scheduled_date: c.scheduled_date,
            created_at: now,
            updated_at: now,
        };
        let id = existing.id;

        let mut repository = MockTestDemoRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(move |entry| {
                entry.id == id
                    && entry.name.as_str() == "Budi"
                    && entry.scheduled_date == moved
                    && entry.created_at == now
            })
            .times(1)
            .returning(Ok);

        let service = DemoService::new(Arc::new(repository));
        service.update_demo(&id, command("Budi", moved)).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_missing_demo() {
        let mut repository = MockTestDemoRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = DemoService::new(Arc::new(repository));
        let result = service.get_demo(&DemoEntryId::new()).await;
        assert!(matches!(result, Err(DemoError::NotFound(_))));
    }
}
