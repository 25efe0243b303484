// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Flags left as Option<...> are "not given": the config file (or the
// built-in default) decides. See config::merge_cli_args.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;
use crate::links::DomainMatch;

#[derive(Parser, Debug)]
#[command(
    name = "link-extractor",
    version,
    about = "Crawl a website and collect its internal and external links",
    long_about = "link-extractor starts at a URL, follows every link that stays on the same \
                  domain (up to a visit budget), and writes the internal and external links \
                  it found to two text files."
)]
pub struct Cli {
    /// Target URL to start crawling from (e.g., https://example.com)
    pub url: String,

    /// Maximum number of pages to fetch. 0 means no limit [default: 50]
    #[arg(short = 'm', long = "max-urls")]
    pub max_urls: Option<usize>,

    /// Number of pages fetched concurrently [default: 8]
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// How link hosts are compared to the seed's host [default: subdomain]
    #[arg(long, value_enum)]
    pub domain_match: Option<DomainMatch>,

    /// Send this User-Agent on every request instead of rotating
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Directory for the link files [default: .]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the full report as JSON instead of the summary
    #[arg(long)]
    pub json: bool,

    /// Don't write the link files
    #[arg(long)]
    pub no_files: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors, and no per-link lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            max_visits: self.max_urls,
            workers: self.workers,
            timeout_secs: self.timeout,
            domain_match: self.domain_match,
            user_agent: self.user_agent.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}
