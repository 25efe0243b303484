// src/crawl/frontier.rs
// =============================================================================
// The queue of internal pages waiting to be fetched.
//
// It is a plain FIFO (breadth-first: pages close to the seed go first). It
// does no deduplication of its own: only URLs that won the registry's
// try_record_internal() gate are ever pushed, so each URL arrives here once.
// =============================================================================

use std::collections::VecDeque;

use crate::links::CanonicalUrl;

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CanonicalUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: CanonicalUrl) {
        self.queue.push_back(url);
    }

    pub fn pop(&mut self) -> Option<CanonicalUrl> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Extend<CanonicalUrl> for Frontier {
    fn extend<T: IntoIterator<Item = CanonicalUrl>>(&mut self, iter: T) {
        self.queue.extend(iter);
    }
}
