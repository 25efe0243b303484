// src/crawl/controller.rs
// =============================================================================
// This module runs the crawl itself, breadth-first, with a small worker pool.
//
// How it works:
// 1. Put the seed in the frontier
// 2. While there is room in the pool, pop a URL and claim a visit from the
//    budget; if the budget is spent, stop handing out work
// 3. Each worker fetches its page, pulls out hrefs and runs the extractor
// 4. The new internal URLs a worker returns go to the back of the frontier
// 5. Repeat until the frontier is empty and nothing is in flight, the budget
//    is spent, or the crawl is cancelled
//
// Failure policy:
// - A page that fails to fetch still counts as visited and yields no links
// - Every fetch is wrapped in a timeout, so no worker can hang forever
// - Cancelling stops new fetches; fetches already running are awaited
//
// Rust concepts:
// - JoinSet: a set of spawned tasks you can await one at a time
// - tokio::select!: wait on whichever of several futures finishes first
// - Arc: shared ownership of the registry, transport and classifier
// =============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::frontier::Frontier;
use super::registry::Registry;
use crate::config::CrawlConfig;
use crate::links::{extract_hrefs, extract_links, CanonicalUrl, Classifier};
use crate::transport::{FetchError, Transport};

/// Everything a finished crawl produced.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: CanonicalUrl,
    pub target_domain: String,
    pub internal: Vec<CanonicalUrl>,
    pub external: Vec<CanonicalUrl>,
    pub pages_visited: usize,
    pub failed_pages: usize,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

impl CrawlReport {
    pub fn total_links(&self) -> usize {
        self.internal.len() + self.external.len()
    }
}

// What one worker hands back to the coordinator
struct PageOutcome {
    url: CanonicalUrl,
    result: Result<Vec<CanonicalUrl>, FetchError>,
}

pub struct Crawler {
    transport: Arc<dyn Transport>,
    registry: Arc<Registry>,
    classifier: Arc<Classifier>,
    max_visits: usize,
    workers: usize,
    timeout: Duration,
}

impl Crawler {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<Registry>,
        classifier: Classifier,
        config: &CrawlConfig,
    ) -> Self {
        Self {
            transport,
            registry,
            classifier: Arc::new(classifier),
            max_visits: config.max_visits,
            workers: config.workers.max(1),
            timeout: config.timeout(),
        }
    }

    // Crawls from `seed` until the frontier drains, the visit budget runs out
    // or `cancel` fires. Never fails: per-page errors are logged and counted.
    pub async fn run(&self, seed: CanonicalUrl, cancel: CancellationToken) -> CrawlReport {
        let started = Instant::now();
        info!(
            seed = %seed,
            domain = self.classifier.target_domain(),
            max_visits = self.max_visits,
            workers = self.workers,
            "starting crawl"
        );

        let mut frontier = Frontier::new();
        if self.registry.schedule_seed(&seed) {
            frontier.push(seed.clone());
        }

        let mut in_flight: JoinSet<PageOutcome> = JoinSet::new();
        let mut failed_pages = 0;
        let mut budget_spent = false;
        let mut cancelled = false;

        loop {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            // Top up the pool
            while !budget_spent && in_flight.len() < self.workers {
                let Some(url) = frontier.pop() else {
                    break;
                };

                match self.registry.try_claim_visit(self.max_visits) {
                    Some(visit) => {
                        debug!(%url, visit, "fetching");
                        in_flight.spawn(visit_page(
                            Arc::clone(&self.transport),
                            Arc::clone(&self.classifier),
                            Arc::clone(&self.registry),
                            url,
                            self.timeout,
                        ));
                    }
                    None => {
                        // the popped URL is dropped, not deferred
                        info!(
                            max_visits = self.max_visits,
                            left_in_frontier = frontier.len() + 1,
                            "visit budget reached"
                        );
                        budget_spent = true;
                    }
                }
            }

            // Nothing running and nothing we may start: done
            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                Some(joined) = in_flight.join_next() => {
                    if let Some(fresh) = self.settle(joined, &mut failed_pages) {
                        frontier.extend(fresh);
                    }
                }
            }
        }

        if cancelled {
            info!(in_flight = in_flight.len(), "crawl cancelled, waiting for running fetches");
        }
        if !frontier.is_empty() {
            debug!(left = frontier.len(), "pages discovered but not fetched");
        }

        // Let running fetches finish (each is bounded by its timeout). Their
        // links are already in the registry; nothing new gets fetched.
        while let Some(joined) = in_flight.join_next().await {
            self.settle(joined, &mut failed_pages);
        }

        let (internal, external) = self.registry.snapshot();
        let report = CrawlReport {
            seed,
            target_domain: self.classifier.target_domain().to_string(),
            internal: internal.into_iter().collect(),
            external: external.into_iter().collect(),
            pages_visited: self.registry.visited(),
            failed_pages,
            cancelled,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            pages = report.pages_visited,
            failed = report.failed_pages,
            internal = report.internal.len(),
            external = report.external.len(),
            cancelled = report.cancelled,
            "crawl finished"
        );
        report
    }

    // Logs a finished worker and returns the URLs to enqueue, if any
    fn settle(
        &self,
        joined: Result<PageOutcome, tokio::task::JoinError>,
        failed_pages: &mut usize,
    ) -> Option<Vec<CanonicalUrl>> {
        match joined {
            Ok(PageOutcome { url, result: Ok(fresh) }) => {
                let (internal, external) = self.registry.counts();
                debug!(%url, new_links = fresh.len(), internal, external, "page done");
                Some(fresh)
            }
            Ok(PageOutcome { url, result: Err(e) }) => {
                warn!(%url, error = %e, "failed to fetch page");
                *failed_pages += 1;
                None
            }
            Err(e) => {
                warn!(error = %e, "page task panicked");
                *failed_pages += 1;
                None
            }
        }
    }
}

// Fetch one page and run the extractor over it
async fn visit_page(
    transport: Arc<dyn Transport>,
    classifier: Arc<Classifier>,
    registry: Arc<Registry>,
    url: CanonicalUrl,
    timeout: Duration,
) -> PageOutcome {
    let body = match tokio::time::timeout(timeout, transport.fetch(&url)).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => return PageOutcome { url, result: Err(e) },
        Err(_) => {
            return PageOutcome {
                url,
                result: Err(FetchError::Timeout),
            }
        }
    };

    let hrefs = extract_hrefs(&body);
    let fresh = extract_links(&url, hrefs, &classifier, &registry);
    PageOutcome {
        url,
        result: Ok(fresh),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a loop and not recursion?
//    - "fetch a page, then crawl every link on it" written recursively grows
//      the call stack with every hop, and a site with deep pagination can
//      blow it
//    - An explicit queue (the Frontier) keeps memory on the heap and makes a
//      worker pool easy to bolt on
//
// 2. Why does the budget get claimed BEFORE spawning?
//    - try_claim_visit() is an atomic compare-and-swap on the counter
//    - If we counted after fetching, eight workers could all start while the
//      counter still read "9 of 10", and we would fetch 17 pages
//
// 3. What is `let Some(url) = frontier.pop() else { break; };`?
//    - let-else: bind the pattern or run the else block (which must exit)
//    - Same as a match with a `None => break` arm, but flatter
//
// 4. What does JoinSet::join_next() return?
//    - Some(Ok(value)) when a task finished normally
//    - Some(Err(join_error)) when a task panicked or was aborted
//    - None when the set is empty
// -----------------------------------------------------------------------------
