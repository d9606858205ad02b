//! Error taxonomy for the scraping pipeline.
//!
//! Failures are grouped by the subsystem they come from, because the control
//! flow treats each group differently:
//!
//! - [`ConfigError`]: fatal, aborts the run before any site is processed
//! - [`FetchError`]: listing retrieval; transient variants are retried,
//!   permission denial aborts the site's fetch immediately
//! - [`ExtractError`]: one article's download/parse; the article is skipped
//!   and the site continues
//! - [`StoreError`]: hosted-table access; query failures fail open, insert
//!   failures drop the record
//!
//! Nothing in this module (or anything built on it) terminates the overall
//! run; only [`ConfigError`] is allowed to do that, and only from `main`.

use reqwest::StatusCode;
use thiserror::Error;

/// Fatal configuration problems detected before any site is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment configuration: {0}")]
    MissingCredential(&'static str),

    #[error("could not read sites file {path}: {source}")]
    SitesFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse sites file {path}: {source}")]
    SitesParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures while retrieving a listing page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("permission denied by {url} (HTTP 403)")]
    PermissionDenied { url: String },

    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("invalid listing url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Whether another attempt at the same request may succeed.
    ///
    /// Timeouts, connection errors, and non-2xx responses are transient.
    /// HTTP 403 is not: the site is refusing the client, and hammering it
    /// again within the same run will not change its mind. A malformed URL
    /// cannot succeed on retry either.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Status { .. } => true,
            FetchError::PermissionDenied { .. } | FetchError::InvalidUrl(_) => false,
        }
    }
}

/// Failures while extracting one article's content.
///
/// Any of these means "no data for this candidate": the caller logs the
/// failure and moves on to the next link.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("article page returned HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("could not derive title and summary from {url}")]
    Parse { url: String },

    #[error("unexpected failure extracting {url}: {message}")]
    Unexpected { url: String, message: String },
}

/// Failures talking to the hosted table.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("store response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
