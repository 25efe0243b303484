// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - A bounded pool of concurrent fetches
// - A visit budget (0 = no limit) and Ctrl-C cancellation
// - A shared registry so every link is reported once and fetched once
//
// Submodules:
// - registry: the internal/external link sets and the visit counter
// - frontier: the FIFO of pages waiting to be fetched
// - controller: the crawl loop that ties it all together
// =============================================================================

mod controller;
mod frontier;
mod registry;

pub use controller::{CrawlReport, Crawler};
pub use registry::{LinkEvent, Registry};
