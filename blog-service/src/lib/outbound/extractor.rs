use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;

use crate::domain::article::errors::ArticleError;
use crate::domain::article::models::ExtractedArticle;
use crate::domain::article::models::SourceUrl;
use crate::domain::article::ports::ContentExtractor;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static OG_SITE_NAME: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:site_name"]"#));
static OG_IMAGE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:image"]"#));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static HEADING: Lazy<Selector> = Lazy::new(|| selector("h1"));
static CONTAINER: Lazy<Selector> = Lazy::new(|| selector("article, main"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));

/// Fetches pages over HTTP and reads them with [`parse_document`].
pub struct HttpContentExtractor {
    client: Client,
}

impl HttpContentExtractor {
    /// # Errors
    /// Fails when the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentExtractor for HttpContentExtractor {
    async fn extract(&self, url: &SourceUrl) -> Result<ExtractedArticle, ArticleError> {
        let fetch_failed = |e: reqwest::Error| ArticleError::FetchFailed(e.to_string());

        let html = self
            .client
            .get(url.as_url().clone())
            .send()
            .await
            .map_err(fetch_failed)?
            .error_for_status()
            .map_err(fetch_failed)?
            .text()
            .await
            .map_err(fetch_failed)?;

        tracing::debug!(url = %url.as_str(), bytes = html.len(), "Fetched external page");
        parse_document(&html, url)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|meta| meta.value().attr("content"))
        .map(collapse_whitespace)
        .find(|content| !content.is_empty())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(text_of)
        .find(|text| !text.is_empty())
}

/// Pull title, body, teaser, site name and lead image out of an HTML page.
///
/// Open Graph tags win over document fallbacks. The body is the inner HTML
/// of the first `<article>`/`<main>`, or else every non-empty paragraph.
/// Relative image URLs are resolved against the page URL.
///
/// # Errors
/// * `FetchFailed` - Page has no title or no readable body
pub fn parse_document(html: &str, url: &SourceUrl) -> Result<ExtractedArticle, ArticleError> {
    let document = Html::parse_document(html);

    let title = meta_content(&document, &OG_TITLE)
        .or_else(|| first_text(&document, &TITLE))
        .or_else(|| first_text(&document, &HEADING))
        .ok_or_else(|| ArticleError::FetchFailed(format!("{}: page has no title", url.as_str())))?;

    let content = document
        .select(&CONTAINER)
        .map(|container| container.inner_html().trim().to_string())
        .find(|inner| !inner.is_empty())
        .unwrap_or_else(|| {
            document
                .select(&PARAGRAPH)
                .filter(|p| !text_of(*p).is_empty())
                .map(|p| p.html())
                .collect::<Vec<_>>()
                .join("\n")
        });

    if content.is_empty() {
        return Err(ArticleError::FetchFailed(format!(
            "{}: page has no readable content",
            url.as_str()
        )));
    }

    let excerpt = meta_content(&document, &OG_DESCRIPTION)
        .or_else(|| meta_content(&document, &META_DESCRIPTION))
        .or_else(|| first_text(&document, &PARAGRAPH));

    let image = meta_content(&document, &OG_IMAGE)
        .and_then(|src| url.as_url().join(&src).ok())
        .map(|resolved| resolved.to_string());

    Ok(ExtractedArticle {
        title,
        content,
        excerpt,
        site_name: meta_content(&document, &OG_SITE_NAME).unwrap_or_default(),
        image,
    })
}
