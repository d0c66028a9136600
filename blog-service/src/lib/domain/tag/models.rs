use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::identifier::uuid_identifier;
use crate::domain::pagination::PageRequest;
use crate::domain::tag::errors::TagNameError;

uuid_identifier!(
    /// Tag unique identifier type
    TagId
);

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag name value type. Trimmed, non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName(String);

impl TagName {
    pub const MAX_LENGTH: usize = 100;

    pub fn new(name: String) -> Result<Self, TagNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(TagNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TagNameError::TooLong {
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

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListTagsQuery {
    pub page: PageRequest,
    pub search: Option<String>,
}
