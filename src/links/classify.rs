// src/links/classify.rs
// =============================================================================
// Decides what a canonical URL is to this crawl: internal, external, or junk.
//
// Internal links get crawled, external ones only get recorded. Which bucket
// a URL lands in depends on how its host compares to the target domain,
// and that comparison is configurable (see DomainMatch).
// =============================================================================

use std::collections::HashSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::canonical::{has_scheme_and_host, CanonicalUrl, RejectReason};

/// Schemes that never point at a crawlable page.
pub const DEFAULT_DISALLOWED_SCHEMES: &[&str] = &[
    "mailto", "market", "tel", "javascript", "data", "file", "ftp", "intent", "sms",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    Internal,
    External,
    Rejected(RejectReason),
}

/// How a host is compared against the target domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DomainMatch {
    /// Host must equal the target
    Exact,
    /// Host equals the target or is a subdomain of it
    #[default]
    Subdomain,
    /// Target appears anywhere in the host. Loose: `notexample.com` matches `example.com`
    Substring,
}

impl DomainMatch {
    pub fn matches(self, host: &str, target: &str) -> bool {
        match self {
            DomainMatch::Exact => host == target,
            DomainMatch::Subdomain => {
                host == target
                    || host
                        .strip_suffix(target)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
            DomainMatch::Substring => host.contains(target),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    target_domain: String,
    mode: DomainMatch,
    disallowed_schemes: HashSet<String>,
}

impl Classifier {
    pub fn new<I, S>(target_domain: &str, mode: DomainMatch, disallowed_schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            target_domain: target_domain.to_ascii_lowercase(),
            mode,
            disallowed_schemes: disallowed_schemes
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn target_domain(&self) -> &str {
        &self.target_domain
    }

    pub fn classify(&self, url: &CanonicalUrl) -> LinkClass {
        let scheme = url.scheme();
        if self.disallowed_schemes.contains(scheme) {
            return LinkClass::Rejected(RejectReason::DisallowedScheme(scheme.to_string()));
        }

        // CanonicalUrl is already checked on construction, but don't lean on it
        if !has_scheme_and_host(url.as_url()) {
            return LinkClass::Rejected(RejectReason::MissingHost);
        }

        if self.mode.matches(url.host(), &self.target_domain) {
            LinkClass::Internal
        } else {
            LinkClass::External
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::canonical::canonicalize;
    use url::Url;

    fn url(s: &str) -> CanonicalUrl {
        let base = Url::parse("http://example.com/").unwrap();
        canonicalize(&base, s).unwrap()
    }

    fn classifier(target: &str, mode: DomainMatch) -> Classifier {
        Classifier::new(target, mode, DEFAULT_DISALLOWED_SCHEMES.iter().copied())
    }

    #[test]
    fn test_same_host_is_internal() {
        let c = classifier("example.com", DomainMatch::Subdomain);
        assert_eq!(c.classify(&url("http://example.com/about")), LinkClass::Internal);
        assert_eq!(c.classify(&url("https://example.com/")), LinkClass::Internal);
    }

    #[test]
    fn test_other_host_is_external() {
        let c = classifier("example.com", DomainMatch::Subdomain);
        assert_eq!(c.classify(&url("http://other.com/")), LinkClass::External);
    }

    #[test]
    fn test_subdomain_mode() {
        let c = classifier("example.com", DomainMatch::Subdomain);
        assert_eq!(c.classify(&url("http://blog.example.com/")), LinkClass::Internal);
        assert_eq!(c.classify(&url("http://a.b.example.com/")), LinkClass::Internal);
        // lookalikes are not subdomains
        assert_eq!(c.classify(&url("http://notexample.com/")), LinkClass::External);
        assert_eq!(c.classify(&url("http://example.com.evil.io/")), LinkClass::External);
    }

    #[test]
    fn test_exact_mode() {
        let c = classifier("example.com", DomainMatch::Exact);
        assert_eq!(c.classify(&url("http://example.com/x")), LinkClass::Internal);
        assert_eq!(c.classify(&url("http://blog.example.com/")), LinkClass::External);
        assert_eq!(c.classify(&url("http://notexample.com/")), LinkClass::External);
    }

    #[test]
    fn test_substring_mode_keeps_loose_matching() {
        let c = classifier("example.com", DomainMatch::Substring);
        assert_eq!(c.classify(&url("http://blog.example.com/")), LinkClass::Internal);
        // the known false positive of substring matching
        assert_eq!(c.classify(&url("http://notexample.com/")), LinkClass::Internal);
        assert_eq!(c.classify(&url("http://other.com/")), LinkClass::External);
    }

    #[test]
    fn test_www_is_not_stripped() {
        let c = classifier("www.example.com", DomainMatch::Subdomain);
        assert_eq!(c.classify(&url("http://example.com/")), LinkClass::External);
    }

    #[test]
    fn test_target_is_case_insensitive() {
        let c = classifier("Example.COM", DomainMatch::Exact);
        assert_eq!(c.target_domain(), "example.com");
        assert_eq!(c.classify(&url("http://EXAMPLE.com/")), LinkClass::Internal);
    }

    #[test]
    fn test_disallowed_scheme_rejected() {
        let c = classifier("example.com", DomainMatch::Subdomain);
        assert_eq!(
            c.classify(&url("market://details/app")),
            LinkClass::Rejected(RejectReason::DisallowedScheme("market".to_string()))
        );
        assert_eq!(
            c.classify(&url("ftp://example.com/pub")),
            LinkClass::Rejected(RejectReason::DisallowedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_disallowed_schemes_are_configurable() {
        let c = Classifier::new("example.com", DomainMatch::Subdomain, ["HTTPS"]);
        assert!(matches!(
            c.classify(&url("https://example.com/")),
            LinkClass::Rejected(RejectReason::DisallowedScheme(_))
        ));
        assert_eq!(c.classify(&url("ftp://example.com/")), LinkClass::Internal);
    }
}
