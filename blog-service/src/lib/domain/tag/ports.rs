use async_trait::async_trait;

use crate::domain::pagination::Page;
use crate::domain::slug::SlugChecker;
use crate::domain::tag::errors::TagError;
use crate::domain::tag::models::ListTagsQuery;
use crate::domain::tag::models::Tag;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;

#[async_trait]
pub trait TagServicePort: Send + Sync + 'static {
    /// Create a tag with a unique slug derived from its name.
    ///
    /// # Errors
    /// * `SlugAlreadyExists` - A concurrent insert claimed the same slug
    /// * `DatabaseError` - Database operation failed
    async fn create_tag(&self, name: TagName) -> Result<Tag, TagError>;

    async fn get_tag(&self, id: &TagId) -> Result<Tag, TagError>;

    async fn list_tags(&self, query: ListTagsQuery) -> Result<Page<Tag>, TagError>;

    /// Rename a tag; the slug is regenerated when the name changes.
    ///
    /// # Errors
    /// * `NotFound` - Tag does not exist
    async fn update_tag(&self, id: &TagId, name: TagName) -> Result<Tag, TagError>;

    /// Delete a tag and its article associations.
    ///
    /// # Errors
    /// * `NotFound` - Tag does not exist
    async fn delete_tag(&self, id: &TagId) -> Result<(), TagError>;
}

#[async_trait]
pub trait TagRepository: SlugChecker<Error = TagError> + 'static {
    async fn create(&self, tag: Tag) -> Result<Tag, TagError>;

    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagError>;

    /// Tags matching the given ids; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagError>;

    async fn list(&self, query: &ListTagsQuery) -> Result<Page<Tag>, TagError>;

    async fn update(&self, tag: Tag) -> Result<Tag, TagError>;

    async fn delete(&self, id: &TagId) -> Result<(), TagError>;
}
