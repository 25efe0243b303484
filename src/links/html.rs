// src/links/html.rs
// =============================================================================
// This module pulls raw href values out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, which recovers from broken markup the way
//   browsers do, so parsing never "fails" - worst case we get fewer links
//
// Note that we return the hrefs exactly as written. Resolving and cleaning
// them up is canonical.rs's job.
// =============================================================================

use std::sync::OnceLock;

use scraper::{Html, Selector};

// "[href]" rather than "a[href]": <area>, <link> and friends carry links too
fn href_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    // The selector is a constant, so unwrap() can only fail on a typo here
    SELECTOR.get_or_init(|| Selector::parse("[href]").unwrap())
}

// Extracts the href attribute of every element that has one
//
// Parameters:
//   body: raw response bytes (decoded as UTF-8, invalid bytes replaced)
//
// Returns: hrefs in document order, duplicates included
//
// Example:
//   body = "<a href='/docs'>Docs</a><link href='style.css'>"
//   result = ["/docs", "style.css"]
pub fn extract_hrefs(body: &[u8]) -> Vec<String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    document
        .select(href_selector())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
