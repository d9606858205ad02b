//! Listing-page fetching and candidate link discovery.
//!
//! A listing page is a tag or category page enumerating recent articles.
//! The page is fetched with bounded retry (exponential backoff with jitter,
//! immediate abort on HTTP 403) and parsed for repeated `<article>`
//! containers; the first anchor inside each container becomes a candidate
//! link. Relative hrefs are resolved against the site's own URL, so
//! `/tag/foo` on a `https://es.wired.com/...` site resolves to
//! `https://es.wired.com/tag/foo`.
//!
//! The candidate list is truncated to `max_candidates` at the container
//! level, before any per-article work begins, bounding the cost of a run
//! regardless of how long the listing is.

use crate::errors::FetchError;
use crate::models::SiteDescriptor;
use crate::retry::retry_with_backoff;
use once_cell::sync::Lazy;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static CONTAINER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").unwrap());
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Source of candidate article links for a site.
///
/// The pipeline is written against this trait; [`HttpListing`] is the real
/// implementation and tests substitute canned lists or fixture HTML.
pub trait FetchCandidates {
    /// Return up to `max_candidates` absolute article URLs for `site`, in
    /// listing order. Never fails past this boundary: a site whose listing
    /// cannot be retrieved yields an empty list.
    async fn fetch_candidates(
        &self,
        site: &SiteDescriptor,
        max_candidates: usize,
        max_retries: usize,
    ) -> Vec<String>;
}

/// Listing fetcher backed by the shared HTTP client.
#[derive(Debug)]
pub struct HttpListing<'a> {
    /// Shared client carrying the browser headers and request timeout.
    pub client: &'a reqwest::Client,
}

impl FetchCandidates for HttpListing<'_> {
    #[instrument(level = "info", skip_all, fields(site = %site.name, url = %site.url))]
    async fn fetch_candidates(
        &self,
        site: &SiteDescriptor,
        max_candidates: usize,
        max_retries: usize,
    ) -> Vec<String> {
        let base = match Url::parse(&site.url) {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Configured site URL is not parseable; site yields no candidates");
                return Vec::new();
            }
        };

        let fetched = retry_with_backoff(max_retries, FetchError::is_transient, || {
            fetch_listing_html(self.client, &site.url)
        })
        .await;

        match fetched {
            Ok(html) => {
                let links = parse_candidate_links(&html, &base, max_candidates);
                info!(count = links.len(), "Indexed candidate article links");
                for link in &links {
                    debug!(%link, "Candidate");
                }
                links
            }
            Err(e) => {
                error!(error = %e, "Listing fetch failed; site yields no candidates");
                Vec::new()
            }
        }
    }
}

/// One GET against the listing URL, classified for the retry policy.
async fn fetch_listing_html(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if status == StatusCode::FORBIDDEN {
        return Err(FetchError::PermissionDenied {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }

    Ok(response.text().await?)
}

/// Extract candidate links from listing HTML.
///
/// Takes the first `max_candidates` `<article>` containers in document
/// order and, from each, the first anchor carrying an `href`. Containers
/// without an anchor contribute nothing, so the result can be shorter than
/// `max_candidates` but never longer.
pub fn parse_candidate_links(html: &str, base: &Url, max_candidates: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for container in document.select(&CONTAINER_SELECTOR).take(max_candidates) {
        let Some(anchor) = container.select(&ANCHOR_SELECTOR).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match base.join(href) {
            Ok(resolved) => links.push(resolved.to_string()),
            Err(e) => warn!(href, error = %e, "Skipping unresolvable href"),
        }
    }

    links
}
