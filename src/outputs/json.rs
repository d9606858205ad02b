//! JSON snapshot of the records collected in one run.
//!
//! Written once, at the end of a run, never incrementally: the snapshot is
//! an ordered array of the inserted records (site order, then listing
//! order), pretty-printed with the same field names the hosted table uses.
//! A run that inserted nothing still writes an empty array, which keeps
//! "ran and found nothing" distinguishable from "did not run".

use crate::models::ArticleRecord;
use chrono::Local;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the run's records to `{snapshot_dir}/{date}/articles.json`.
///
/// # Arguments
///
/// * `records` - Every record inserted during this run, in output order
/// * `snapshot_dir` - Base directory for snapshots
///
/// # Returns
///
/// `Ok(())` on success, or an error if directory creation, serialization,
/// or the file write fails.
#[instrument(level = "info", skip_all, fields(snapshot_dir = %snapshot_dir, count = records.len()))]
pub async fn write_snapshot(
    records: &[ArticleRecord],
    snapshot_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;

    let local_date = Local::now().date_naive().to_string();
    let dated_dir = format!("{}/{}", snapshot_dir.trim_end_matches('/'), local_date);

    info!(%dated_dir, "Ensuring snapshot directory exists");
    if let Err(e) = fs::create_dir_all(&dated_dir).await {
        error!(%dated_dir, error = %e, "Failed to create snapshot dir");
        return Err(e.into());
    }

    let snapshot_path = format!("{dated_dir}/articles.json");
    fs::write(&snapshot_path, json).await?;
    info!(path = %snapshot_path, "Wrote run snapshot");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord {
            source: "Wired en Español".to_string(),
            title: title.to_string(),
            link: format!("https://es.wired.com/articulos/{title}"),
            summary: "Resumen.".to_string(),
            published_at: None,
            updated_at: Utc.with_ymd_and_hms(2025, 5, 6, 13, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_round_trips_in_order() {
        let dir = std::env::temp_dir().join("amenazas_news_snapshot_test");
        let dir = dir.to_str().unwrap().to_string();
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let records = vec![record("uno"), record("dos")];
        write_snapshot(&records, &dir).await.unwrap();

        let local_date = Local::now().date_naive().to_string();
        let raw = tokio::fs::read_to_string(format!("{dir}/{local_date}/articles.json"))
            .await
            .unwrap();
        let back: Vec<ArticleRecord> = serde_json::from_str(&raw).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(back[0].title, "uno");
        assert_eq!(back[1].title, "dos");
        assert!(raw.contains("titulo"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_empty_run_writes_empty_array() {
        let dir = std::env::temp_dir().join("amenazas_news_snapshot_empty_test");
        let dir = dir.to_str().unwrap().to_string();
        let _ = tokio::fs::remove_dir_all(&dir).await;

        write_snapshot(&[], &dir).await.unwrap();

        let local_date = Local::now().date_naive().to_string();
        let raw = tokio::fs::read_to_string(format!("{dir}/{local_date}/articles.json"))
            .await
            .unwrap();
        assert_eq!(raw.trim(), "[]");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
