//! The per-site collection pipeline and the run controller.
//!
//! For each configured site: index candidate links from the listing page,
//! extract each candidate in listing order, drop duplicates against the
//! store, insert what survives, and stop once the site's quota of new
//! records is met. Sites are processed strictly sequentially, one link and
//! one store call at a time.
//!
//! Failure containment is the point of this module: an article that fails
//! extraction is skipped, a duplicate-check fault fails open, a failed
//! insert drops only that record, and a site whose listing never loads
//! contributes an empty result. None of those outcomes stops the other
//! candidates, the other sites, or the run.

use crate::models::{ArticleRecord, SiteDescriptor};
use crate::scrapers::article::ExtractArticle;
use crate::scrapers::listing::FetchCandidates;
use crate::store::ArticleStore;
use crate::utils::normalize_title;
use clap::ValueEnum;
use tracing::{error, info, instrument, warn};

/// What to do when a candidate's title is already stored.
///
/// Two revisions of this scraper disagreed on the answer, so it is a
/// configuration choice rather than a constant:
///
/// - `Skip` (the hardened behavior, and the default): a duplicate only
///   skips that one link, and scanning continues.
/// - `Stop`: treat the listing as reverse-chronological and end the site at
///   the first duplicate, on the assumption that everything after it is
///   already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    /// A duplicate skips that single link; later candidates are still scanned.
    Skip,
    /// The first duplicate ends processing of the site entirely.
    Stop,
}

/// Knobs for one pipeline run, shared by every site.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// New records to collect per site before stopping.
    pub num_to_collect: usize,
    /// Candidate links examined per site, at most.
    pub max_candidates: usize,
    /// Listing fetch attempts per site.
    pub max_retries: usize,
    /// Behavior on finding an already-stored title.
    pub duplicate_policy: DuplicatePolicy,
}

/// Duplicate check that fails open.
///
/// A store fault during the query reports "not a duplicate" so ingestion
/// continues; during a store outage this can write duplicate rows, which is
/// the documented trade-off (availability over consistency). The article is
/// never dropped because the check itself failed.
async fn is_duplicate<S: ArticleStore>(store: &S, normalized_title: &str) -> bool {
    match store.exists(normalized_title).await {
        Ok(found) => found,
        Err(e) => {
            warn!(
                title = %normalized_title,
                error = %e,
                "Duplicate check failed; treating title as new"
            );
            false
        }
    }
}

/// Collect up to `options.num_to_collect` new records for one site.
///
/// Returns the records actually inserted, in listing order. Never fails:
/// every per-candidate and per-site fault is logged and contained here.
#[instrument(level = "info", skip_all, fields(site = %site.name))]
pub async fn collect_site<L, E, S>(
    listing: &L,
    extractor: &E,
    store: &S,
    site: &SiteDescriptor,
    options: &PipelineOptions,
) -> Vec<ArticleRecord>
where
    L: FetchCandidates,
    E: ExtractArticle,
    S: ArticleStore,
{
    let links = listing
        .fetch_candidates(site, options.max_candidates, options.max_retries)
        .await;

    let mut collected: Vec<ArticleRecord> = Vec::new();

    for link in links {
        if collected.len() >= options.num_to_collect {
            info!(
                count = collected.len(),
                "Per-site quota reached; stopping this site"
            );
            break;
        }

        let content = match extractor.extract(&link).await {
            Ok(content) => content,
            Err(e) => {
                warn!(%link, error = %e, "Extraction failed; skipping candidate");
                continue;
            }
        };

        if content.title.trim().is_empty() || content.summary.trim().is_empty() {
            warn!(%link, "Extractor produced empty title or summary; skipping candidate");
            continue;
        }

        let normalized = normalize_title(&content.title);
        if is_duplicate(store, &normalized).await {
            match options.duplicate_policy {
                DuplicatePolicy::Skip => {
                    info!(title = %normalized, "Article already stored; skipping candidate");
                    continue;
                }
                DuplicatePolicy::Stop => {
                    info!(
                        title = %normalized,
                        "Article already stored; assuming the rest of the listing is older and stopping this site"
                    );
                    break;
                }
            }
        }

        let record = ArticleRecord::new(site, &link, &content);
        match store.insert(&record).await {
            Ok(()) => {
                info!(title = %record.title, %link, "Inserted article");
                collected.push(record);
            }
            Err(e) => {
                error!(title = %record.title, %link, error = %e, "Insert failed; record dropped");
            }
        }
    }

    collected
}

/// Run every configured site sequentially and concatenate the results.
///
/// Output preserves site iteration order, and within a site, listing order.
/// One site failing to produce anything never prevents the next from being
/// processed.
pub async fn run_all<L, E, S>(
    listing: &L,
    extractor: &E,
    store: &S,
    sites: &[SiteDescriptor],
    options: &PipelineOptions,
) -> Vec<ArticleRecord>
where
    L: FetchCandidates,
    E: ExtractArticle,
    S: ArticleStore,
{
    let mut all_records = Vec::new();

    for site in sites {
        info!(site = %site.name, url = %site.url, "Collecting site");
        let records = collect_site(listing, extractor, store, site, options).await;
        info!(site = %site.name, count = records.len(), "Finished site");
        all_records.extend(records);
    }

    all_records
}
