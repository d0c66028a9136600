use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::article::errors::ArticleError;
use crate::domain::article::errors::ContentError;
use crate::domain::article::errors::ExcerptError;
use crate::domain::article::errors::SortError;
use crate::domain::article::errors::SourceUrlError;
use crate::domain::article::errors::StatusError;
use crate::domain::article::errors::TitleError;
use crate::domain::category::models::CategoryId;
use crate::domain::identifier::uuid_identifier;
use crate::domain::pagination::PageRequest;
use crate::domain::tag::models::TagId;
use crate::domain::user::models::UserId;

uuid_identifier!(
    /// Article unique identifier type
    ArticleId
);

/// Article aggregate entity.
///
/// `category`, `author` and `tags` are read-side projections filled in by
/// the repository; writes only look at the id columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub slug: String,
    pub content: ArticleContent,
    pub excerpt: Option<Excerpt>,
    pub image_url: Option<String>,
    pub category_id: CategoryId,
    pub author_id: UserId,
    pub status: ArticleStatus,
    pub views: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub featured: Option<FeaturedPosition>,
    pub source: Option<String>,
    pub category: Option<CategorySummary>,
    pub author: Option<AuthorSummary>,
    pub tags: Vec<TagSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSummary {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

/// Article title value type. Trimmed, 3 to 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTitle(String);

impl ArticleTitle {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 255;

    pub fn new(title: String) -> Result<Self, TitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();

        if length < Self::MIN_LENGTH {
            Err(TitleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(TitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    /// Build a title from untrusted text, cutting it to the maximum length.
    pub fn truncated(title: &str) -> Result<Self, TitleError> {
        Self::new(title.trim().chars().take(Self::MAX_LENGTH).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Article body; any non-blank text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent(String);

impl ArticleContent {
    pub fn new(content: String) -> Result<Self, ContentError> {
        if content.trim().is_empty() {
            Err(ContentError::Empty)
        } else {
            Ok(Self(content))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short teaser shown in listings, at most 500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt(String);

impl Excerpt {
    pub const MAX_LENGTH: usize = 500;

    pub fn new(excerpt: String) -> Result<Self, ExcerptError> {
        let length = excerpt.chars().count();
        if length > Self::MAX_LENGTH {
            Err(ExcerptError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(excerpt))
        }
    }

    pub fn truncated(excerpt: &str) -> Self {
        Self(excerpt.chars().take(Self::MAX_LENGTH).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleStatus {
    Draft,
    Published,
    Scheduled,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Scheduled => "scheduled",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl FromStr for ArticleStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            "scheduled" => Ok(ArticleStatus::Scheduled),
            "archived" => Ok(ArticleStatus::Archived),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three landing-page slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeaturedPosition(u8);

impl FeaturedPosition {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    /// # Errors
    /// * `InvalidPosition` - Value outside 1..=3
    pub fn new(position: i64) -> Result<Self, ArticleError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&position) {
            Ok(Self(position as u8))
        } else {
            Err(ArticleError::InvalidPosition(position))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        usize::from(self.0 - Self::MIN)
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u8 + Self::MIN)
    }
}

impl fmt::Display for FeaturedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Absolute http(s) URL of a page to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl(reqwest::Url);

impl SourceUrl {
    pub fn new(url: &str) -> Result<Self, SourceUrlError> {
        let parsed =
            reqwest::Url::parse(url.trim()).map_err(|e| SourceUrlError::Malformed(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self(parsed)),
            other => Err(SourceUrlError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn as_url(&self) -> &reqwest::Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    PublishedAt,
    Views,
    Title,
}

impl FromStr for SortField {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "published_at" => Ok(SortField::PublishedAt),
            "views" => Ok(SortField::Views),
            "title" => Ok(SortField::Title),
            other => Err(SortError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(SortError::UnknownOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl ArticleSort {
    /// Admin listing sort; defaults to newest first.
    pub fn parse(field: Option<&str>, order: Option<&str>) -> Result<Self, SortError> {
        Ok(Self {
            field: field.map(str::parse::<SortField>).transpose()?.unwrap_or(SortField::CreatedAt),
            order: order.map(str::parse::<SortOrder>).transpose()?.unwrap_or(SortOrder::Desc),
        })
    }

    /// Public listing sort; `created_at` is not exposed and the default is
    /// most recently published first.
    pub fn parse_public(field: Option<&str>, order: Option<&str>) -> Result<Self, SortError> {
        let field = match field.map(str::parse::<SortField>).transpose()? {
            Some(SortField::CreatedAt) => {
                return Err(SortError::UnknownField("created_at".to_string()))
            }
            Some(field) => field,
            None => SortField::PublishedAt,
        };

        Ok(Self {
            field,
            order: order.map(str::parse::<SortOrder>).transpose()?.unwrap_or(SortOrder::Desc),
        })
    }
}

impl Default for ArticleSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Which articles a listing may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleScope {
    /// Every non-deleted article.
    All,
    /// Published articles whose publish date has passed.
    Published,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListArticlesQuery {
    pub page: PageRequest,
    pub category_id: Option<CategoryId>,
    pub tag_id: Option<TagId>,
    pub status: Option<ArticleStatus>,
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub sort: ArticleSort,
}

#[derive(Debug, Clone)]
pub struct CreateArticleCommand {
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub excerpt: Option<Excerpt>,
    pub image_url: Option<String>,
    pub category_id: CategoryId,
    pub tag_ids: Vec<TagId>,
    pub status: ArticleStatus,
    pub publish_at: Option<DateTime<Utc>>,
}

/// Full edit of an article. Optional fields left as `None` keep their
/// current value.
#[derive(Debug, Clone)]
pub struct UpdateArticleCommand {
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub excerpt: Option<Excerpt>,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub tag_ids: Option<Vec<TagId>>,
    pub status: Option<ArticleStatus>,
    pub publish_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct UpdateStatusCommand {
    pub status: ArticleStatus,
    pub publish_at: Option<DateTime<Utc>>,
}

/// Readable content pulled from an external page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub site_name: String,
    pub image: Option<String>,
}

/// Everything needed to persist an ingested article. Category, tag and
/// slug are resolved by the repository inside its transaction.
#[derive(Debug, Clone)]
pub struct ExternalArticleDraft {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub excerpt: Option<Excerpt>,
    pub image_url: Option<String>,
    pub site_name: String,
    pub source_url: String,
    pub author_id: UserId,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArticleStats {
    pub total_articles: i64,
    pub published_articles: i64,
    pub draft_articles: i64,
    pub total_views: i64,
}

/// A published article with a few related reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicArticle {
    pub article: Article,
    pub related: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(ArticleTitle::new("Hi".to_string()).is_err());
        assert!(ArticleTitle::new("x".repeat(256)).is_err());
        assert_eq!(
            ArticleTitle::new("  Hello  ".to_string()).unwrap().as_str(),
            "Hello"
        );
    }

    #[test]
    fn test_title_truncated() {
        let title = ArticleTitle::truncated(&"a".repeat(400)).unwrap();
        assert_eq!(title.as_str().chars().count(), ArticleTitle::MAX_LENGTH);
    }

    #[test]
    fn test_featured_position_domain() {
        for value in 1..=3 {
            assert_eq!(FeaturedPosition::new(value).unwrap().value() as i64, value);
        }
        assert!(matches!(
            FeaturedPosition::new(0),
            Err(ArticleError::InvalidPosition(0))
        ));
        assert!(matches!(
            FeaturedPosition::new(4),
            Err(ArticleError::InvalidPosition(4))
        ));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("scheduled".parse(), Ok(ArticleStatus::Scheduled));
        assert!("Published".parse::<ArticleStatus>().is_err());
    }

    #[test]
    fn test_source_url_scheme() {
        assert!(SourceUrl::new("https://example.com/post").is_ok());
        assert!(matches!(
            SourceUrl::new("ftp://example.com/file"),
            Err(SourceUrlError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            SourceUrl::new("not a url"),
            Err(SourceUrlError::Malformed(_))
        ));
    }

    #[test]
    fn test_public_sort_hides_created_at() {
        assert!(ArticleSort::parse_public(Some("created_at"), None).is_err());
        assert_eq!(
            ArticleSort::parse_public(None, None).unwrap().field,
            SortField::PublishedAt
        );
        assert_eq!(
            ArticleSort::parse(Some("views"), Some("ASC")).unwrap(),
            ArticleSort {
                field: SortField::Views,
                order: SortOrder::Asc
            }
        );
    }
}
