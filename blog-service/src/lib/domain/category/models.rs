use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::category::errors::CategoryNameError;
use crate::domain::identifier::uuid_identifier;
use crate::domain::pagination::PageRequest;

uuid_identifier!(
    /// Category unique identifier type
    CategoryId
);

/// Name of the category auto-created for articles ingested from a URL.
pub const EXTERNAL_CATEGORY_NAME: &str = "external";

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category name value type. Trimmed, non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName(String);

impl CategoryName {
    pub const MAX_LENGTH: usize = 100;

    pub fn new(name: String) -> Result<Self, CategoryNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(CategoryNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(CategoryNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListCategoriesQuery {
    pub page: PageRequest,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert_eq!(CategoryName::new(" News ".to_string()).unwrap().as_str(), "News");
        assert_eq!(CategoryName::new("".to_string()), Err(CategoryNameError::Empty));
        assert!(matches!(
            CategoryName::new("x".repeat(101)),
            Err(CategoryNameError::TooLong { max: 100, actual: 101 })
        ));
    }
}
