// src/links/mod.rs
// =============================================================================
// Everything about a single link, from raw markup to a classified URL.
//
// Submodules:
// - html: pulls raw href strings out of a page
// - canonical: resolves an href and strips query/fragment
// - classify: internal / external / rejected
// - extract: runs the three above over one page and updates the registry
// =============================================================================

mod canonical;
mod classify;
mod extract;
mod html;

// Re-export so callers can write `links::CanonicalUrl` instead of
// `links::canonical::CanonicalUrl`
pub use canonical::CanonicalUrl;
pub use classify::{Classifier, DomainMatch, DEFAULT_DISALLOWED_SCHEMES};
pub use extract::extract_links;
pub use html::extract_hrefs;
