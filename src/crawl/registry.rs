// src/crawl/registry.rs
// =============================================================================
// The shared "what have we seen" state of one crawl.
//
// Every worker holds an Arc<Registry>. It answers two questions atomically:
// - is this link new? (so it is reported once)
// - should anyone fetch this page? (so it is fetched once)
//
// Both link sets sit behind ONE lock. That way a URL can never slip into
// internal and external at the same time, and the check + insert for a link
// is a single critical section even when two pages find it together.
//
// The visited counter is separate: it is an AtomicUsize, touched once per
// fetched page.
// =============================================================================

use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::links::CanonicalUrl;

/// Emitted once per URL the first time it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Internal(CanonicalUrl),
    External(CanonicalUrl),
}

#[derive(Debug, Default)]
struct LinkSets {
    internal: HashSet<CanonicalUrl>,
    external: HashSet<CanonicalUrl>,
    // URLs already claimed for fetching. The seed lives here without being
    // in `internal`.
    scheduled: HashSet<CanonicalUrl>,
}

#[derive(Debug, Default)]
pub struct Registry {
    sets: Mutex<LinkSets>,
    visited: AtomicUsize,
    events: Option<UnboundedSender<LinkEvent>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that reports every newly recorded link on `events`.
    pub fn with_events(events: UnboundedSender<LinkEvent>) -> Self {
        Self {
            events: Some(events),
            ..Self::default()
        }
    }

    /// Claims the seed for fetching without reporting it as a discovered link.
    /// Returns false if it was already scheduled.
    pub fn schedule_seed(&self, url: &CanonicalUrl) -> bool {
        self.sets.lock().scheduled.insert(url.clone())
    }

    /// Records an external link. True only the first time `url` is seen.
    ///
    /// A URL already recorded as internal is left alone.
    pub fn record_external(&self, url: &CanonicalUrl) -> bool {
        let inserted = {
            let mut sets = self.sets.lock();
            !sets.internal.contains(url) && sets.external.insert(url.clone())
        };

        if inserted {
            self.emit(LinkEvent::External(url.clone()));
        }
        inserted
    }

    /// The dedup gate for internal links.
    ///
    /// Records `url` in the internal set if it is new there, and returns true
    /// iff it was also new to the fetch schedule, i.e. the caller now owns
    /// enqueueing it. For any URL, at most one call ever returns true.
    pub fn try_record_internal(&self, url: &CanonicalUrl) -> bool {
        let (newly_internal, newly_scheduled) = {
            let mut sets = self.sets.lock();
            if sets.external.contains(url) {
                (false, false)
            } else {
                let newly_internal = sets.internal.insert(url.clone());
                let newly_scheduled = newly_internal && sets.scheduled.insert(url.clone());
                (newly_internal, newly_scheduled)
            }
        };

        if newly_internal {
            self.emit(LinkEvent::Internal(url.clone()));
        }
        newly_scheduled
    }

    /// Counts one fetched page. Returns the new total.
    pub fn increment_visited(&self) -> usize {
        self.visited.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Counts one fetched page unless that would go past `max_visits`
    /// (0 = unlimited). Returns the new total, or None when the budget is spent.
    pub fn try_claim_visit(&self, max_visits: usize) -> Option<usize> {
        if max_visits == 0 {
            return Some(self.increment_visited());
        }

        self.visited
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max_visits).then_some(n + 1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    pub fn visited(&self) -> usize {
        self.visited.load(Ordering::SeqCst)
    }

    /// (internal, external) set sizes.
    pub fn counts(&self) -> (usize, usize) {
        let sets = self.sets.lock();
        (sets.internal.len(), sets.external.len())
    }

    /// Sorted copies of the internal and external sets.
    ///
    /// Meant for the end of a crawl; mid-crawl it is only a point-in-time view.
    pub fn snapshot(&self) -> (BTreeSet<CanonicalUrl>, BTreeSet<CanonicalUrl>) {
        let sets = self.sets.lock();
        (
            sets.internal.iter().cloned().collect(),
            sets.external.iter().cloned().collect(),
        )
    }

    fn emit(&self, event: LinkEvent) {
        if let Some(tx) = &self.events {
            // receiver gone just means nobody is printing anymore
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use url::Url;

    fn url(s: &str) -> CanonicalUrl {
        let base = Url::parse("http://example.com/").unwrap();
        CanonicalUrl::parse_seed(base.join(s).unwrap().as_str()).unwrap()
    }

    #[test]
    fn test_record_external_once() {
        let registry = Registry::new();
        let u = url("http://other.com/");
        assert!(registry.record_external(&u));
        assert!(!registry.record_external(&u));
        assert_eq!(registry.counts(), (0, 1));
    }

    #[test]
    fn test_try_record_internal_once() {
        let registry = Registry::new();
        let u = url("/about");
        assert!(registry.try_record_internal(&u));
        assert!(!registry.try_record_internal(&u));
        assert_eq!(registry.counts(), (1, 0));
    }

    #[test]
    fn test_seed_is_scheduled_but_not_reported() {
        let registry = Registry::new();
        let seed = url("/");
        assert!(registry.schedule_seed(&seed));
        assert_eq!(registry.counts(), (0, 0));

        // a page linking back to the seed records it, but nobody re-enqueues it
        assert!(!registry.try_record_internal(&seed));
        assert_eq!(registry.counts(), (1, 0));
        assert!(!registry.try_record_internal(&seed));
    }

    #[test]
    fn test_sets_stay_disjoint() {
        let registry = Registry::new();
        let u = url("/x");

        assert!(registry.try_record_internal(&u));
        assert!(!registry.record_external(&u));

        let v = url("http://other.com/y");
        assert!(registry.record_external(&v));
        assert!(!registry.try_record_internal(&v));

        let (internal, external) = registry.snapshot();
        assert!(internal.is_disjoint(&external));
        assert_eq!(internal.len(), 1);
        assert_eq!(external.len(), 1);
    }

    #[test]
    fn test_events_emitted_once_per_url() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let registry = Registry::with_events(tx);

        registry.try_record_internal(&url("/a"));
        registry.try_record_internal(&url("/a"));
        registry.record_external(&url("http://other.com/"));
        registry.record_external(&url("http://other.com/"));
        drop(registry);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                LinkEvent::Internal(url("/a")),
                LinkEvent::External(url("http://other.com/")),
            ]
        );
    }

    #[test]
    fn test_visit_budget() {
        let registry = Registry::new();
        assert_eq!(registry.try_claim_visit(2), Some(1));
        assert_eq!(registry.try_claim_visit(2), Some(2));
        assert_eq!(registry.try_claim_visit(2), None);
        assert_eq!(registry.visited(), 2);
    }

    #[test]
    fn test_unlimited_budget() {
        let registry = Registry::new();
        for i in 1..=100 {
            assert_eq!(registry.try_claim_visit(0), Some(i));
        }
        assert_eq!(registry.increment_visited(), 101);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_internal_dedup() {
        let registry = Arc::new(Registry::new());
        let target = url("/shared");

        let tasks = (0..64).map(|_| {
            let registry = Arc::clone(&registry);
            let target = target.clone();
            tokio::spawn(async move { registry.try_record_internal(&target) })
        });

        let wins = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(wins, 1);
        let (internal, _) = registry.snapshot();
        assert_eq!(internal.len(), 1);
        assert!(internal.contains(&target));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_never_exceed_budget() {
        let registry = Arc::new(Registry::new());

        let tasks = (0..50).map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.try_claim_visit(7) })
        });

        let granted = futures::future::join_all(tasks)
            .await
            .into_iter()
            .filter(|r| matches!(r, Ok(Some(_))))
            .count();

        assert_eq!(granted, 7);
        assert_eq!(registry.visited(), 7);
    }
}
