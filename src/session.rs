use std::collections::{HashSet, VecDeque};

use crate::records::PageRecord;

/// Shared crawl state for one run: frontier, visited set, media set and the
/// accumulated page records. Owned by the frontier engine and torn down at
/// end of run.
///
/// The frontier is an explicit FIFO queue with a membership set for O(1)
/// duplicate checks, so traversal order is deterministic breadth-first.
/// Invariant: a URL is never in both `visited` and `queued`; popping moves
/// it into `visited` atomically, before extraction can rediscover it.
#[derive(Debug, Default)]
pub struct CrawlSession {
    visited: HashSet<String>,
    queued: HashSet<String>,
    queue: VecDeque<String>,
    media_seen: HashSet<String>,
    media: Vec<String>,
    pages: Vec<PageRecord>,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canonical URL unless it was already visited or queued.
    /// Returns whether the URL was newly queued.
    pub fn enqueue(&mut self, key: String) -> bool {
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return false;
        }
        self.queued.insert(key.clone());
        self.queue.push_back(key);
        true
    }

    /// Pop the next URL to visit, marking it visited. Both successful and
    /// failed extractions leave it visited; failures are not re-queued.
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        self.visited.insert(url.clone());
        Some(url)
    }

    pub fn is_frontier_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Record a media URL, deduplicated by exact string, first-seen order
    pub fn add_media(&mut self, url: &str) {
        if self.media_seen.insert(url.to_string()) {
            self.media.push(url.to_string());
        }
    }

    pub fn media_urls(&self) -> &[String] {
        &self.media
    }

    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    pub fn push_page(&mut self, record: PageRecord) {
        self.pages.push(record);
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }
}
