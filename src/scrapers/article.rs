//! Article-page extraction: title, summary, and publish date.
//!
//! Given a candidate URL, download the page and derive the three fields a
//! record needs. Extraction leans on the metadata publishers already ship:
//!
//! - title: `og:title` meta tag, falling back to the first `<h1>`, then
//!   the document `<title>`
//! - summary: `og:description` / `description` meta tags, falling back to
//!   the first substantial paragraphs of the body
//! - publish date: `article:published_time` meta tag, then JSON-LD
//!   `datePublished`, then the first `<time datetime>` element
//!
//! A page with no derivable title or summary is a [`ExtractError::Parse`];
//! the publish date is genuinely optional and absence is not an error.
//! No failure here is ever allowed to end the run; callers treat any
//! [`ExtractError`] as "no data" and continue with the next candidate.

use crate::errors::ExtractError;
use crate::models::ArticleContent;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static PUBLISHED_TIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="article:published_time"]"#).unwrap());
static JSON_LD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static TIME_DATETIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time[datetime]").unwrap());

/// Paragraphs shorter than this are navigation chrome, captions, or
/// cookie-banner text, not article lead.
const MIN_PARAGRAPH_CHARS: usize = 60;
/// How many paragraphs the fallback summary may join.
const MAX_SUMMARY_PARAGRAPHS: usize = 3;

/// Extractor of article content from a candidate URL.
///
/// [`HttpExtractor`] is the real implementation; pipeline tests substitute
/// stubs that answer from canned content.
pub trait ExtractArticle {
    /// Download and parse one article page.
    async fn extract(&self, url: &str) -> Result<ArticleContent, ExtractError>;
}

/// Extractor backed by the shared HTTP client.
#[derive(Debug)]
pub struct HttpExtractor<'a> {
    /// Shared client carrying the browser headers and request timeout.
    pub client: &'a reqwest::Client,
}

impl ExtractArticle for HttpExtractor<'_> {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn extract(&self, url: &str) -> Result<ArticleContent, ExtractError> {
        let response = self.client.get(url).send().await.map_err(|source| {
            if source.is_builder() {
                ExtractError::Unexpected {
                    url: url.to_string(),
                    message: source.to_string(),
                }
            } else {
                ExtractError::Download {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status {
                status,
                url: url.to_string(),
            });
        }

        // A body that cuts off mid-transfer surfaces here, which keeps
        // half-downloaded pages out of the parser.
        let html = response.text().await.map_err(|source| ExtractError::Download {
            url: url.to_string(),
            source,
        })?;

        let content = parse_article(&html, url)?;
        debug!(
            title = %content.title,
            has_date = content.published_at.is_some(),
            "Extracted article content"
        );
        Ok(content)
    }
}

/// Derive title, summary, and publish date from article HTML.
pub fn parse_article(html: &str, url: &str) -> Result<ArticleContent, ExtractError> {
    let document = Html::parse_document(html);

    let title = parse_title(&document);
    let summary = parse_summary(&document);

    match (title, summary) {
        (Some(title), Some(summary)) => Ok(ArticleContent {
            title,
            summary,
            published_at: parse_publish_date(&document),
        }),
        _ => Err(ExtractError::Parse {
            url: url.to_string(),
        }),
    }
}

fn parse_title(document: &Html) -> Option<String> {
    if let Some(meta) = document.select(&OG_TITLE).next() {
        if let Some(content) = meta.value().attr("content") {
            let content = content.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }

    for selector in [&*H1, &*TITLE] {
        if let Some(element) = document.select(selector).next() {
            let text = element.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    None
}

fn parse_summary(document: &Html) -> Option<String> {
    for selector in [&*OG_DESCRIPTION, &*META_DESCRIPTION] {
        if let Some(meta) = document.select(selector).next() {
            if let Some(content) = meta.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
    }

    // No description metadata: fall back to the lead paragraphs.
    let lead: Vec<String> = document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| text.chars().count() >= MIN_PARAGRAPH_CHARS)
        .take(MAX_SUMMARY_PARAGRAPHS)
        .collect();

    if lead.is_empty() {
        None
    } else {
        Some(lead.join(" "))
    }
}

/// Publish date, from the most reliable source the page offers.
fn parse_publish_date(document: &Html) -> Option<DateTime<Utc>> {
    if let Some(meta) = document.select(&PUBLISHED_TIME).next() {
        if let Some(parsed) = meta.value().attr("content").and_then(parse_datetime) {
            return Some(parsed);
        }
    }

    for script in document.select(&JSON_LD) {
        let raw = script.text().collect::<String>();
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw.trim()) {
            if let Some(parsed) = json_ld_date_published(&value) {
                return Some(parsed);
            }
        }
    }

    if let Some(time) = document.select(&TIME_DATETIME).next() {
        if let Some(parsed) = time.value().attr("datetime").and_then(parse_datetime) {
            return Some(parsed);
        }
    }

    None
}

/// Find a parseable `datePublished` in a JSON-LD value.
///
/// Handles the shapes outlets actually publish: a bare object, an array of
/// objects, and an object wrapping a `@graph` array.
fn json_ld_date_published(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(parsed) = map
                .get("datePublished")
                .and_then(|v| v.as_str())
                .and_then(parse_datetime)
            {
                return Some(parsed);
            }
            map.get("@graph").and_then(json_ld_date_published)
        }
        serde_json::Value::Array(items) => items.iter().find_map(json_ld_date_published),
        _ => None,
    }
}

/// Parse the datetime formats seen in publisher metadata.
///
/// RFC 3339 first, then an offset-less timestamp, then a bare date (taken
/// as midnight UTC). Anything else is treated as "no parseable date".
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
