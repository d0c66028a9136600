use async_trait::async_trait;

use crate::domain::demo::errors::DemoError;
use crate::domain::demo::models::DemoCommand;
use crate::domain::demo::models::DemoEntry;
use crate::domain::demo::models::DemoEntryId;
use crate::domain::demo::models::ListDemosQuery;
use crate::domain::pagination::Page;

#[async_trait]
pub trait DemoServicePort: Send + Sync + 'static {
    async fn create_demo(&self, command: DemoCommand) -> Result<DemoEntry, DemoError>;

    async fn get_demo(&self, id: &DemoEntryId) -> Result<DemoEntry, DemoError>;

    async fn list_demos(&self, query: ListDemosQuery) -> Result<Page<DemoEntry>, DemoError>;

    /// # Errors
    /// * `NotFound` - Demo request does not exist
    async fn update_demo(
        &self,
        id: &DemoEntryId,
        command: DemoCommand,
    ) -> Result<DemoEntry, DemoError>;

    async fn delete_demo(&self, id: &DemoEntryId) -> Result<(), DemoError>;
}

#[async_trait]
pub trait DemoRepository: Send + Sync + 'static {
    async fn create(&self, entry: DemoEntry) -> Result<DemoEntry, DemoError>;

    async fn find_by_id(&self, id: &DemoEntryId) -> Result<Option<DemoEntry>, DemoError>;

    async fn list(&self, query: &ListDemosQuery) -> Result<Page<DemoEntry>, DemoError>;

    async fn update(&self, entry: DemoEntry) -> Result<DemoEntry, DemoError>;

    /// # Errors
    /// * `NotFound` - No row was deleted
    async fn delete(&self, id: &DemoEntryId) -> Result<(), DemoError>;
}
