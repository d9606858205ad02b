//! Data models for scraped articles and their persisted representation.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`SiteDescriptor`]: a configured news source (listing page)
//! - [`ArticleContent`]: what the extractor derives from one article page
//! - [`ArticleRecord`]: the row persisted to the hosted `amenazas` table
//!
//! The persisted record uses serde renames so the Rust field names stay
//! idiomatic while the wire format matches the Spanish column names of the
//! hosted table.

use crate::errors::ConfigError;
use crate::utils::normalize_title;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A news source to scrape: a human-readable name and its listing-page URL.
///
/// Descriptors are read-only input for a run. They come from the built-in
/// default list or from a YAML sites file (see [`load_sites`]).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteDescriptor {
    /// Display name, stored verbatim in each record's `fuente` column.
    pub name: String,
    /// Absolute URL of the tag/category listing page.
    pub url: String,
}

/// Content derived from a single article page.
///
/// Ephemeral: lives only between extraction and the duplicate check /
/// insert for one candidate link.
#[derive(Debug, Clone)]
pub struct ArticleContent {
    /// The article headline, as printed on the page.
    pub title: String,
    /// A short summary derived from the page's own metadata or lead text.
    pub summary: String,
    /// The publish date, when the page exposes one in a parseable form.
    pub published_at: Option<DateTime<Utc>>,
}

/// A row in the hosted `amenazas` table.
///
/// This is the single externally persisted entity. `title` holds the
/// normalized form (lower-cased, trimmed) because that is the
/// de-duplication key; `updated_at` is always the insertion time.
/// Records are only ever inserted, never updated or deleted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The configured source name.
    #[serde(rename = "fuente")]
    pub source: String,
    /// Normalized article title; at most one stored row per value.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Absolute URL of the article.
    #[serde(rename = "enlace")]
    pub link: String,
    /// Article summary.
    #[serde(rename = "resumen")]
    pub summary: String,
    /// Publish date from the article page, if one could be parsed.
    #[serde(rename = "fecha_publicacion")]
    pub published_at: Option<DateTime<Utc>>,
    /// When this row was inserted.
    #[serde(rename = "fecha_actualizacion")]
    pub updated_at: DateTime<Utc>,
}

impl ArticleRecord {
    /// Build a record from extracted content, normalizing the title and
    /// stamping the insertion time.
    pub fn new(site: &SiteDescriptor, link: &str, content: &ArticleContent) -> Self {
        Self {
            source: site.name.clone(),
            title: normalize_title(&content.title),
            link: link.to_string(),
            summary: content.summary.clone(),
            published_at: content.published_at,
            updated_at: Utc::now(),
        }
    }
}

/// The built-in site list: Wired en Español's ciberseguridad tag.
pub fn default_sites() -> Vec<SiteDescriptor> {
    vec![SiteDescriptor {
        name: "Wired en Español".to_string(),
        url: "https://es.wired.com/tag/ciberseguridad".to_string(),
    }]
}

/// Load the site list, from a YAML file when one is given.
///
/// The file is a YAML sequence of `{name, url}` entries. Without a path the
/// built-in [`default_sites`] list is used.
///
/// # Errors
///
/// [`ConfigError::SitesFile`] if the file cannot be read,
/// [`ConfigError::SitesParse`] if it is not a valid site list. Either is
/// fatal for the run.
pub fn load_sites(path: Option<&str>) -> Result<Vec<SiteDescriptor>, ConfigError> {
    let Some(path) = path else {
        return Ok(default_sites());
    };

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SitesFile {
        path: path.to_string(),
        source,
    })?;
    let sites: Vec<SiteDescriptor> =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::SitesParse {
            path: path.to_string(),
            source,
        })?;
    info!(count = sites.len(), path, "Loaded sites file");
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_site() -> SiteDescriptor {
        SiteDescriptor {
            name: "Wired en Español".to_string(),
            url: "https://es.wired.com/tag/ciberseguridad".to_string(),
        }
    }

    #[test]
    fn test_record_normalizes_title_and_stamps_updated_at() {
        let content = ArticleContent {
            title: "  Nuevo Ransomware Ataca Hospitales ".to_string(),
            summary: "Un resumen.".to_string(),
            published_at: None,
        };
        let record = ArticleRecord::new(&test_site(), "https://es.wired.com/a", &content);

        assert_eq!(record.title, "nuevo ransomware ataca hospitales");
        assert_eq!(record.source, "Wired en Español");
        assert!(record.published_at.is_none());
        assert!(record.updated_at <= Utc::now());
    }

    #[test]
    fn test_record_serializes_to_spanish_columns() {
        let record = ArticleRecord {
            source: "Wired en Español".to_string(),
            title: "titular normalizado".to_string(),
            link: "https://es.wired.com/a".to_string(),
            summary: "Resumen.".to_string(),
            published_at: Some(Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap()),
            updated_at: Utc.with_ymd_and_hms(2025, 5, 6, 13, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        for column in [
            "fuente",
            "titulo",
            "enlace",
            "resumen",
            "fecha_publicacion",
            "fecha_actualizacion",
        ] {
            assert!(json.contains(column), "missing column {column} in {json}");
        }
        assert!(!json.contains("published_at"));
    }

    #[test]
    fn test_record_null_publish_date_round_trips() {
        let record = ArticleRecord {
            source: "Wired en Español".to_string(),
            title: "sin fecha".to_string(),
            link: "https://es.wired.com/b".to_string(),
            summary: "Resumen.".to_string(),
            published_at: None,
            updated_at: Utc.with_ymd_and_hms(2025, 5, 6, 13, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"fecha_publicacion\":null"));
        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert!(back.published_at.is_none());
    }

    #[test]
    fn test_default_sites_single_wired_entry() {
        let sites = default_sites();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].url, "https://es.wired.com/tag/ciberseguridad");
    }

    #[test]
    fn test_load_sites_without_path_uses_defaults() {
        let sites = load_sites(None).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "Wired en Español");
    }

    #[test]
    fn test_sites_yaml_parses() {
        let yaml = r#"
- name: "Wired en Español"
  url: "https://es.wired.com/tag/ciberseguridad"
- name: "Otra Fuente"
  url: "https://example.com/seguridad"
"#;
        let sites: Vec<SiteDescriptor> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].name, "Otra Fuente");
    }
}
