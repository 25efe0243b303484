// src/links/canonical.rs
// =============================================================================
// Turns a raw href into the key we deduplicate on.
//
// A canonical URL is scheme + "://" + host + path. Query strings and
// fragments are dropped, so these all collapse to one key:
//   /about
//   /about?x=1
//   /about#team
//
// The `url` crate does the heavy lifting: it resolves relative links the
// way a browser does, lowercases the host, drops default ports and
// percent-encodes the path consistently.
// =============================================================================

use std::fmt;

use serde::{Serialize, Serializer};
use url::Url;

use crate::error::CrawlError;

/// Why an href never made it into either link set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// `href=""`, or only whitespace
    Empty,
    /// `Url::join` refused it (e.g. `http://[::1` or a bad port)
    Unresolvable,
    /// Resolved fine but there is no scheme/host pair (`mailto:`, `javascript:`, `data:`)
    MissingHost,
    /// Scheme is on the disallowed list
    DisallowedScheme(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => f.write_str("empty href"),
            RejectReason::Unresolvable => f.write_str("could not resolve against page URL"),
            RejectReason::MissingHost => f.write_str("no scheme or host"),
            RejectReason::DisallowedScheme(s) => write!(f, "disallowed scheme '{}'", s),
        }
    }
}

/// An absolute URL with query and fragment removed.
///
/// Only [`canonicalize`] and [`CanonicalUrl::parse_seed`] build one, so every
/// value in the crawl has already passed the scheme/host check.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Canonicalizes the seed against itself.
    ///
    /// Unlike discovered hrefs, a bad seed is fatal: there is nothing to crawl.
    /// Only http(s) seeds are accepted because that is all the transport speaks.
    pub fn parse_seed(raw: &str) -> Result<Self, CrawlError> {
        let invalid = |reason: String| CrawlError::InvalidSeed {
            url: raw.to_string(),
            reason,
        };

        let base = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        let seed = canonicalize(&base, raw).map_err(|r| invalid(r.to_string()))?;

        if !matches!(seed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", seed.scheme())));
        }

        Ok(seed)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Host without port. Never empty for a value built by this module.
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CanonicalUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolves `href` against `base` and strips query + fragment.
pub fn canonicalize(base: &Url, href: &str) -> Result<CanonicalUrl, RejectReason> {
    let href = href.trim();
    if href.is_empty() {
        return Err(RejectReason::Empty);
    }

    // join() handles both cases: absolute hrefs replace the base entirely,
    // relative ones are resolved against it
    let mut url = base.join(href).map_err(|_| RejectReason::Unresolvable)?;

    if !has_scheme_and_host(&url) {
        return Err(RejectReason::MissingHost);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(CanonicalUrl(url))
}

/// The structural validity check: both a scheme and a non-empty host.
pub fn has_scheme_and_host(url: &Url) -> bool {
    !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty())
}
