use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::pagination::Page;
use crate::domain::slug;
use crate::domain::tag::errors::TagError;
use crate::domain::tag::models::ListTagsQuery;
use crate::domain::tag::models::Tag;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;
use crate::domain::tag::ports::TagRepository;
use crate::domain::tag::ports::TagServicePort;

pub struct TagService<TR>
where
    TR: TagRepository,
{
    repository: Arc<TR>,
}

impl<TR> TagService<TR>
where
    TR: TagRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }

    async fn find(&self, id: &TagId) -> Result<Tag, TagError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TagError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<TR> TagServicePort for TagService<TR>
where
    TR: TagRepository,
{
    async fn create_tag(&self, name: TagName) -> Result<Tag, TagError> {
        let slug = slug::generate_unique_slug(self.repository.as_ref(), name.as_str()).await?;
        let now = Utc::now();

        let tag = self
            .repository
            .create(Tag {
                id: TagId::new(),
                name,
                slug,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(tag_id = %tag.id, slug = %tag.slug, "Tag created");
        Ok(tag)
    }

    async fn get_tag(&self, id: &TagId) -> Result<Tag, TagError> {
        self.find(id).await
    }

    async fn list_tags(
        &self,
        query: ListTagsQuery,
    ) -> Result<Page<Tag>, TagError> {
        self.repository.list(&query).await
    }

    async fn update_tag(
        &self,
        id: &TagId,
        name: TagName,
    ) -> Result<Tag, TagError> {
        let mut tag = self.find(id).await?;

        if tag.name != name && !slug::is_candidate_for(&tag.slug, name.as_str()) {
            tag.slug =
                slug::generate_unique_slug(self.repository.as_ref(), name.as_str()).await?;
        }
        tag.name = name;
        tag.updated_at = Utc::now();

        self.repository.update(tag).await
    }

    async fn delete_tag(&self, id: &TagId) -> Result<(), TagError> {
        self.repository.delete(id).await?;
        tracing::info!(tag_id = %id, "Tag deleted");
        Ok(())
    }
}
