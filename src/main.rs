//! # Amenazas News
//!
//! A cybersecurity-news collector that scrapes article listings from
//! Spanish-language outlets, extracts title/summary/publish-date from each
//! article, de-duplicates against a hosted Supabase table, and inserts
//! whatever is genuinely new.
//!
//! ## Usage
//!
//! ```sh
//! SUPABASE_URL=https://xyz.supabase.co \
//! SUPABASE_ANON_KEY=... \
//! amenazas_news --snapshot-dir ./data
//! ```
//!
//! ## Architecture
//!
//! One invocation is one run-to-completion pass, strictly sequential:
//! 1. **Indexing**: fetch each site's listing page (bounded retry with
//!    backoff) and collect up to `--max-candidates` article links
//! 2. **Extraction**: download each candidate and derive title, summary,
//!    and publish date from the page's own metadata
//! 3. **De-duplication**: check the normalized title against the hosted
//!    table; skip (or stop the site, per `--on-duplicate`) when it exists
//! 4. **Persistence**: insert new records; optionally write a JSON snapshot
//!    of everything inserted at the end of the run
//!
//! Only missing store credentials abort a run. Every other failure is
//! logged and contained to the candidate or site it happened in.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod errors;
mod models;
mod outputs;
mod pipeline;
mod retry;
mod scrapers;
mod store;
mod utils;

use cli::Cli;
use errors::ConfigError;
use models::load_sites;
use pipeline::PipelineOptions;
use scrapers::article::HttpExtractor;
use scrapers::listing::HttpListing;
use store::SupabaseStore;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("amenazas_news starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.snapshot_dir, args.articles_per_site, args.max_candidates, args.max_retries, "Parsed CLI arguments");

    // --- Credentials: the one fatal check, before any site is touched ---
    let Some(supabase_url) = args.supabase_url.as_deref() else {
        error!("SUPABASE_URL is not set; aborting before any site is processed");
        return Err(Box::new(ConfigError::MissingCredential("SUPABASE_URL")) as Box<dyn Error>);
    };
    let Some(supabase_key) = args.supabase_key.as_deref() else {
        error!("SUPABASE_ANON_KEY is not set; aborting before any site is processed");
        return Err(Box::new(ConfigError::MissingCredential("SUPABASE_ANON_KEY")) as Box<dyn Error>);
    };

    // Early check: ensure the snapshot dir is writable before doing any work
    if let Some(ref snapshot_dir) = args.snapshot_dir {
        if let Err(e) = ensure_writable_dir(snapshot_dir).await {
            error!(
                path = %snapshot_dir,
                error = %e,
                "Snapshot directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let sites = load_sites(args.sites.as_deref())?;
    info!(count = sites.len(), "Sites configured for this run");

    // --- Shared handles, created once and passed by reference ---
    let client = scrapers::http_client()?;
    let store = SupabaseStore::new(client.clone(), supabase_url, supabase_key);
    let listing = HttpListing { client: &client };
    let extractor = HttpExtractor { client: &client };

    let options = PipelineOptions {
        num_to_collect: args.articles_per_site,
        max_candidates: args.max_candidates,
        max_retries: args.max_retries,
        duplicate_policy: args.on_duplicate,
    };

    // ---- Collect all sites sequentially ----
    let records = pipeline::run_all(&listing, &extractor, &store, &sites, &options).await;
    info!(count = records.len(), "Total new articles inserted this run");

    // ---- Snapshot output ----
    if let Some(ref snapshot_dir) = args.snapshot_dir {
        if let Err(e) = outputs::json::write_snapshot(&records, snapshot_dir).await {
            error!(error = %e, "Failed to write run snapshot");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        inserted = records.len(),
        "Execution complete"
    );

    Ok(())
}
