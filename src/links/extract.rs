// src/links/extract.rs
// =============================================================================
// Turns one page's raw hrefs into the internal URLs worth crawling next.
//
// For every href:
// 1. canonicalize it against the page URL (junk is skipped)
// 2. classify it (disallowed schemes are skipped)
// 3. external -> record it, done
// 4. internal -> ask the registry; keep it only if the registry says it's new
//
// This knows nothing about fetching, queues or budgets. It only reads hrefs
// and writes to the registry.
// =============================================================================

use tracing::trace;

use super::canonical::{canonicalize, CanonicalUrl};
use super::classify::{Classifier, LinkClass};
use crate::crawl::Registry;

pub fn extract_links<I, S>(
    page: &CanonicalUrl,
    hrefs: I,
    classifier: &Classifier,
    registry: &Registry,
) -> Vec<CanonicalUrl>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fresh = Vec::new();

    for href in hrefs {
        let href = href.as_ref();

        let url = match canonicalize(page.as_url(), href) {
            Ok(url) => url,
            Err(reason) => {
                trace!(page = %page, href, %reason, "skipping href");
                continue;
            }
        };

        match classifier.classify(&url) {
            LinkClass::Rejected(reason) => {
                trace!(page = %page, href, %reason, "skipping href");
            }
            LinkClass::External => {
                registry.record_external(&url);
            }
            LinkClass::Internal => {
                if registry.try_record_internal(&url) {
                    fresh.push(url);
                }
            }
        }
    }

    fresh
}
