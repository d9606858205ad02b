//! Utility functions for title normalization, string manipulation, and
//! file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Title normalization for de-duplication keys
//! - String truncation for logging
//! - File system validation for the snapshot directory

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Normalize an article title into its de-duplication key.
///
/// Titles are compared and stored in normalized form: surrounding whitespace
/// removed and every character lower-cased. The same transform is applied
/// before the store lookup and before the insert, so a title can never match
/// itself under one form and miss under the other.
///
/// The function is idempotent: normalizing an already-normalized title
/// returns it unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_title("  Nuevo Malware en América Latina "), "nuevo malware en américa latina");
/// ```
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The original string if shorter than `max`, otherwise a truncated version
/// with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= max)
            .last()
            .unwrap_or(0);
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Arguments
///
/// * `path` - The directory path to validate
///
/// # Returns
///
/// `Ok(())` if the directory exists and is writable, or an error describing
/// the failure.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Snapshot directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
