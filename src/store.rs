//! Hosted-table access for persisted article records.
//!
//! Records live in a Supabase-hosted table named `amenazas`, reached over
//! its PostgREST HTTP surface. Exactly two operations are used:
//!
//! - a filtered select (`titulo=eq.<normalized title>`) backing the
//!   duplicate check
//! - a row insert with `Prefer: return=minimal`
//!
//! The [`ArticleStore`] trait is the seam the pipeline is written against;
//! [`SupabaseStore`] is the real implementation, and tests substitute
//! in-memory stubs.

use crate::errors::StoreError;
use crate::models::ArticleRecord;
use tracing::{debug, instrument};

/// The hosted table holding one row per normalized article title.
const TABLE: &str = "amenazas";

/// Async interface to the persistent article store.
///
/// Both operations key on the normalized title; callers are responsible for
/// normalizing before lookup (see [`crate::utils::normalize_title`]).
pub trait ArticleStore {
    /// Whether a record with this normalized title already exists.
    async fn exists(&self, normalized_title: &str) -> Result<bool, StoreError>;

    /// Insert a new record. The table has no transactional uniqueness
    /// constraint; the pre-insert [`exists`](ArticleStore::exists) check is
    /// the only duplicate guard, so a concurrent external writer can still
    /// race a row in between.
    async fn insert(&self, record: &ArticleRecord) -> Result<(), StoreError>;
}

/// REST client for the Supabase-hosted `amenazas` table.
///
/// Constructed once at run start from the environment-provided base URL and
/// anon key, then passed by reference to every component that needs it.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    /// Create a store handle.
    ///
    /// # Arguments
    ///
    /// * `client` - The shared HTTP client (carries the 15s timeout)
    /// * `base_url` - Supabase project URL, e.g. `https://xyz.supabase.co`
    /// * `api_key` - The anon key, sent as both `apikey` header and bearer token
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }
}

impl ArticleStore for SupabaseStore {
    #[instrument(level = "debug", skip_all, fields(title = %normalized_title))]
    async fn exists(&self, normalized_title: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .get(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "titulo"),
                ("titulo", &format!("eq.{normalized_title}")),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        debug!(matches = rows.len(), "Duplicate-check query answered");
        Ok(!rows.is_empty())
    }

    #[instrument(level = "debug", skip_all, fields(title = %record.title))]
    async fn insert(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Row inserted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_joins_cleanly() {
        let client = reqwest::Client::new();
        let with_slash = SupabaseStore::new(client.clone(), "https://xyz.supabase.co/", "key");
        let without = SupabaseStore::new(client, "https://xyz.supabase.co", "key");

        assert_eq!(with_slash.table_url(), "https://xyz.supabase.co/rest/v1/amenazas");
        assert_eq!(without.table_url(), with_slash.table_url());
    }
}
