// src/error.rs
// =============================================================================
// Errors that stop a crawl before it does any useful work.
//
// Per-page problems (timeouts, 404s, junk hrefs) are NOT here: those are
// recovered inside the crawl loop. Everything in CrawlError is fatal and
// ends up as exit code 2 in main.rs.
//
// Rust concepts:
// - thiserror: derive Display + Error for an enum
// - #[from]: lets the ? operator convert foreign errors automatically
//   It also makes the wrapped error the source(), so messages leave it out:
//   main prints the whole chain with {:#}
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML parse error")]
    Toml(#[from] toml::de::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("could not build HTTP client")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
