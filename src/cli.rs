//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. The store credentials can only sensibly come from the
//! environment (`SUPABASE_URL`, `SUPABASE_ANON_KEY`); everything else has a
//! flag with a default matching the production run.

use crate::pipeline::DuplicatePolicy;
use clap::Parser;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Default run: Wired en Español, 3 new articles, snapshot skipped
/// amenazas_news
///
/// # Write a snapshot and scan a longer slice of the listing
/// amenazas_news --snapshot-dir ./data --max-candidates 20
///
/// # Earlier revision's behavior: stop the site at the first duplicate
/// amenazas_news --on-duplicate stop
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory for the end-of-run JSON snapshot (omit to skip writing one)
    #[arg(short, long)]
    pub snapshot_dir: Option<String>,

    /// Optional YAML file with the sites to scrape (defaults to the built-in list)
    #[arg(long)]
    pub sites: Option<String>,

    /// New articles to collect per site
    #[arg(long, default_value_t = 3)]
    pub articles_per_site: usize,

    /// Candidate links examined per site, at most
    #[arg(long, default_value_t = 10)]
    pub max_candidates: usize,

    /// Listing fetch attempts per site
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,

    /// What to do when a candidate's title is already stored
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Skip)]
    pub on_duplicate: DuplicatePolicy,

    /// Supabase project base URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase anon key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["amenazas_news"]);

        assert!(cli.snapshot_dir.is_none());
        assert!(cli.sites.is_none());
        assert_eq!(cli.articles_per_site, 3);
        assert_eq!(cli.max_candidates, 10);
        assert_eq!(cli.max_retries, 3);
        assert_eq!(cli.on_duplicate, DuplicatePolicy::Skip);
    }

    #[test]
    fn test_cli_duplicate_policy_values() {
        let cli = Cli::parse_from(["amenazas_news", "--on-duplicate", "stop"]);
        assert_eq!(cli.on_duplicate, DuplicatePolicy::Stop);

        let cli = Cli::parse_from(["amenazas_news", "--on-duplicate", "skip"]);
        assert_eq!(cli.on_duplicate, DuplicatePolicy::Skip);
    }

    #[test]
    fn test_cli_snapshot_short_flag() {
        let cli = Cli::parse_from(["amenazas_news", "-s", "./data"]);
        assert_eq!(cli.snapshot_dir.as_deref(), Some("./data"));
    }

    #[test]
    fn test_cli_credentials_from_flags() {
        let cli = Cli::parse_from([
            "amenazas_news",
            "--supabase-url",
            "https://xyz.supabase.co",
            "--supabase-key",
            "anon-key",
        ]);
        assert_eq!(cli.supabase_url.as_deref(), Some("https://xyz.supabase.co"));
        assert_eq!(cli.supabase_key.as_deref(), Some("anon-key"));
    }
}
