// src/config.rs
// =============================================================================
// Crawl settings: defaults, an optional TOML file, then CLI flags on top.
//
// Example file (every key optional):
//
//   [crawl]
//   max_visits = 200
//   workers = 4
//   timeout_secs = 15
//   domain_match = "exact"
//   disallowed_schemes = ["mailto", "tel", "javascript"]
//   user_agents = ["my-bot/1.0"]
//
//   [output]
//   dir = "reports"
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CrawlError, Result};
use crate::links::{DomainMatch, DEFAULT_DISALLOWED_SCHEMES};
use crate::transport::DEFAULT_USER_AGENTS;

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Maximum pages fetched (0 = no limit)
    pub max_visits: usize,
    /// Concurrent fetches
    pub workers: usize,
    pub timeout_secs: u64,
    pub domain_match: DomainMatch,
    pub disallowed_schemes: Vec<String>,
    /// Rotation pool. Ignored when `fixed_user_agent` is set.
    pub user_agents: Vec<String>,
    pub fixed_user_agent: Option<String>,
    pub output_dir: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_visits: 50,
            workers: 8,
            timeout_secs: 10,
            domain_match: DomainMatch::default(),
            disallowed_schemes: DEFAULT_DISALLOWED_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            fixed_user_agent: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl CrawlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CrawlError::Config("workers must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(CrawlError::Config("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    crawl: Option<CrawlSection>,
    output: Option<OutputSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CrawlSection {
    max_visits: Option<usize>,
    workers: Option<usize>,
    timeout_secs: Option<u64>,
    domain_match: Option<DomainMatch>,
    disallowed_schemes: Option<Vec<String>>,
    user_agents: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    dir: Option<PathBuf>,
}

/// Loads a TOML file and merges it over the defaults.
pub fn load_config(path: &Path) -> Result<CrawlConfig> {
    let content = std::fs::read_to_string(path)?;
    let file_config: FileConfig = toml::from_str(&content)?;

    let mut config = CrawlConfig::default();

    if let Some(crawl) = file_config.crawl {
        if let Some(max_visits) = crawl.max_visits {
            config.max_visits = max_visits;
        }
        if let Some(workers) = crawl.workers {
            config.workers = workers;
        }
        if let Some(timeout) = crawl.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(mode) = crawl.domain_match {
            config.domain_match = mode;
        }
        if let Some(schemes) = crawl.disallowed_schemes {
            config.disallowed_schemes = schemes;
        }
        if let Some(agents) = crawl.user_agents {
            config.user_agents = agents;
        }
    }

    if let Some(output) = file_config.output {
        if let Some(dir) = output.dir {
            config.output_dir = dir;
        }
    }

    Ok(config)
}

/// CLI flags that override the config. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct Overrides {
    pub max_visits: Option<usize>,
    pub workers: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub domain_match: Option<DomainMatch>,
    pub user_agent: Option<String>,
    pub output_dir: Option<PathBuf>,
}

pub fn merge_cli_args(config: &mut CrawlConfig, overrides: Overrides) {
    if let Some(m) = overrides.max_visits {
        config.max_visits = m;
    }
    if let Some(w) = overrides.workers {
        config.workers = w;
    }
    if let Some(t) = overrides.timeout_secs {
        config.timeout_secs = t;
    }
    if let Some(mode) = overrides.domain_match {
        config.domain_match = mode;
    }
    if let Some(ua) = overrides.user_agent {
        config.fixed_user_agent = Some(ua);
    }
    if let Some(dir) = overrides.output_dir {
        config.output_dir = dir;
    }
}
