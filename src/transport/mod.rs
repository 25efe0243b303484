// src/transport/mod.rs
// =============================================================================
// How pages get fetched.
//
// The crawler only talks to the Transport trait. The real implementation is
// HttpTransport (reqwest); tests plug in an in-memory map of URL -> HTML.
//
// Submodules:
// - http: reqwest-backed Transport
// - user_agent: User-Agent rotation
// =============================================================================

mod http;
mod user_agent;

use async_trait::async_trait;
use thiserror::Error;

use crate::links::CanonicalUrl;

pub use http::HttpTransport;
pub use user_agent::{FixedUserAgent, RotatingUserAgents, UserAgentSource, DEFAULT_USER_AGENTS};

/// Why a single page could not be fetched. Never fatal to the crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("{0}")]
    Request(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the raw body.
    async fn fetch(&self, url: &CanonicalUrl) -> Result<Vec<u8>, FetchError>;
}
