use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::domain::category::models::ListCategoriesQuery;
use crate::domain::category::ports::CategoryRepository;
use crate::domain::category::ports::CategoryServicePort;
use crate::domain::pagination::Page;
use crate::domain::slug;

pub struct CategoryService<CR>
where
    CR: CategoryRepository,
{
    repository: Arc<CR>,
}

impl<CR> CategoryService<CR>
where
    CR: CategoryRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }

    async fn find(&self, id: &CategoryId) -> Result<Category, CategoryError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<CR> CategoryServicePort for CategoryService<CR>
where
    CR: CategoryRepository,
{
    async fn create_category(&self, name: CategoryName) -> Result<Category, CategoryError> {
        let slug = slug::generate_unique_slug(self.repository.as_ref(), name.as_str()).await?;
        let now = Utc::now();

        let category = self
            .repository
            .create(Category {
                id: CategoryId::new(),
                name,
                slug,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    async fn get_category(&self, id: &CategoryId) -> Result<Category, CategoryError> {
        self.find(id).await
    }

    async fn list_categories(
        &self,
        query: ListCategoriesQuery,
    ) -> Result<Page<Category>, CategoryError> {
        self.repository.list(&query).await
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        name: CategoryName,
    ) -> Result<Category, CategoryError> {
        let mut category = self.find(id).await?;

        if category.name != name && !slug::is_candidate_for(&category.slug, name.as_str()) {
            category.slug =
                slug::generate_unique_slug(self.repository.as_ref(), name.as_str()).await?;
        }
        category.name = name;
        category.updated_at = Utc::now();

        self.repository.update(category).await
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), CategoryError> {
        self.repository.delete(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use mockall::mock;

    use super::*;
    use crate::domain::slug::SlugChecker;

    mock! {
        pub TestCategoryRepository {}

        #[async_trait]
        impl SlugChecker for TestCategoryRepository {
            type Error = CategoryError;
            async fn slug_exists(&self, slug: &str) -> Result<bool, CategoryError>;
        }

        #[async_trait]
        impl CategoryRepository for TestCategoryRepository {
            async fn create(&self, category: Category) -> Result<Category, CategoryError>;
            async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError>;
            async fn list(&self, query: &ListCategoriesQuery) -> Result<Page<Category>, CategoryError>;
            async fn update(&self, category: Category) -> Result<Category, CategoryError>;
            async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError>;
        }
    }

    fn name(value: &str) -> CategoryName {
        CategoryName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_identical_names_get_distinct_slugs() {
        let taken = Arc::new(Mutex::new(HashSet::<String>::new()));
        let mut repository = MockTestCategoryRepository::new();

        let lookup = Arc::clone(&taken);
        repository
            .expect_slug_exists()
            .returning(move |slug| Ok(lookup.lock().unwrap().contains(slug)));
        let store = Arc::clone(&taken);
        repository.expect_create().times(2).returning(move |category| {
            store.lock().unwrap().insert(category.slug.clone());
            Ok(category)
        });

        let service = CategoryService::new(Arc::new(repository));
        let first = service.create_category(name("Hello World!")).await.unwrap();
        let second = service.create_category(name("Hello World!")).await.unwrap();

        assert_eq!(first.slug, "hello-world");
        assert_eq!(second.slug, "hello-world-1");
    }

    #[tokio::test]
    async fn test_update_keeps_slug_when_it_would_not_change() {
        let now = Utc::now();
        let existing = Category {
            id: CategoryId::new(),
            name: name("News"),
            slug: "news".to_string(),
            created_at: now,
            updated_at: now,
        };
        let id = existing.id;

        let mut repository = MockTestCategoryRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_slug_exists().times(0);
        repository
            .expect_update()
            .withf(|category| category.slug == "news" && category.name.as_str() == "NEWS")
            .returning(Ok);

        let service = CategoryService::new(Arc::new(repository));
        let updated = service.update_category(&id, name("NEWS")).await.unwrap();
        assert_eq!(updated.slug, "news");
    }

    #[tokio::test]
    async fn test_update_regenerates_slug_on_rename() {
        let now = Utc::now();
        let existing = Category {
            id: CategoryId::new(),
            name: name("News"),
            slug: "news".to_string(),
            created_at: now,
            updated_at: now,
        };
        let id = existing.id;

        let mut repository = MockTestCategoryRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_slug_exists().returning(|_| Ok(false));
        repository.expect_update().returning(Ok);

        let service = CategoryService::new(Arc::new(repository));
        let updated = service
            .update_category(&id, name("Release Notes"))
            .await
            .unwrap();
        assert_eq!(updated.slug, "release-notes");
    }

    #[tokio::test]
    async fn test_get_missing_category() {
        let mut repository = MockTestCategoryRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = CategoryService::new(Arc::new(repository));
        let result = service.get_category(&CategoryId::new()).await;
        assert!(matches!(result, Err(CategoryError::NotFound(_))));
    }
}
