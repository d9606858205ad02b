//! Listing and article scraping for configured news sources.
//!
//! Scraping is a two-phase pattern, one module per phase:
//!
//! 1. **Indexing** ([`listing`]): fetch a site's tag/category page and
//!    collect a bounded list of candidate article links
//! 2. **Extraction** ([`article`]): download each candidate and derive
//!    title, summary, and publish date from the page
//!
//! Both phases share one [`reqwest::Client`] built by [`http_client`]: a
//! realistic browser User-Agent and Accept header, and a fixed 15 second
//! timeout on every request. The client is created once at startup and
//! passed by reference; no module holds global connection state.
//!
//! Failures never cross the pipeline boundary as errors: a listing that
//! cannot be fetched yields an empty candidate list, and an article that
//! cannot be extracted is logged and skipped.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};

pub mod article;
pub mod listing;

/// User-Agent sent on every scrape request. Some outlets serve an empty
/// shell or a block page to obvious non-browser clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Accept header matching what a browser sends for a page navigation.
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

/// Per-request timeout. A hung remote delays the run by at most this much
/// per attempt; there is no other cancellation mechanism.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared HTTP client used for every outbound request.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()
}
