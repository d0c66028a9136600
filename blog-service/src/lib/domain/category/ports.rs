use async_trait::async_trait;

use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::domain::category::models::ListCategoriesQuery;
use crate::domain::pagination::Page;
use crate::domain::slug::SlugChecker;

#[async_trait]
pub trait CategoryServicePort: Send + Sync + 'static {
    /// Create a category with a unique slug derived from its name.
    ///
    /// # Errors
    /// * `SlugAlreadyExists` - A concurrent insert claimed the same slug
    /// * `DatabaseError` - Database operation failed
    async fn create_category(&self, name: CategoryName) -> Result<Category, CategoryError>;

    async fn get_category(&self, id: &CategoryId) -> Result<Category, CategoryError>;

    async fn list_categories(
        &self,
        query: ListCategoriesQuery,
    ) -> Result<Page<Category>, CategoryError>;

    /// Rename a category; the slug is regenerated when the name changes.
    ///
    /// # Errors
    /// * `NotFound` - Category does not exist
    async fn update_category(
        &self,
        id: &CategoryId,
        name: CategoryName,
    ) -> Result<Category, CategoryError>;

    /// # Errors
    /// * `NotFound` - Category does not exist
    /// * `InUse` - Articles still reference the category
    async fn delete_category(&self, id: &CategoryId) -> Result<(), CategoryError>;
}

#[async_trait]
pub trait CategoryRepository: SlugChecker<Error = CategoryError> + 'static {
    async fn create(&self, category: Category) -> Result<Category, CategoryError>;

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError>;

    async fn list(&self, query: &ListCategoriesQuery) -> Result<Page<Category>, CategoryError>;

    async fn update(&self, category: Category) -> Result<Category, CategoryError>;

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError>;
}
