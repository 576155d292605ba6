//! Breadth-first crawl frontier
//!
//! The frontier is a FIFO queue of [`CrawlItem`]s plus the set of canonical URLs that have
//! already been dequeued. Items are scope-checked and normalized before they are pushed;
//! the frontier itself never re-validates them.

use std::collections::{HashSet, VecDeque};
use url::Url;

use crate::url::resolve_candidate;

/// A unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlItem {
    /// Canonical absolute URL to fetch
    pub url: Url,

    /// Page on which the URL was discovered; `None` for seeds
    pub referer: Option<Url>,
}

impl CrawlItem {
    /// Creates a seed item (no referer)
    pub fn seed(url: Url) -> Self {
        Self { url, referer: None }
    }
}

/// FIFO queue of pending items and the visited set
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlItem>,
    visited: HashSet<String>,
    revisits_skipped: u64,
}

impl Frontier {
    /// Creates a frontier holding the given seed items in order
    pub fn new(seeds: Vec<CrawlItem>) -> Self {
        Self {
            queue: seeds.into(),
            visited: HashSet::new(),
            revisits_skipped: 0,
        }
    }

    /// Appends an item to the back of the queue
    pub fn push(&mut self, item: CrawlItem) {
        self.queue.push_back(item);
    }

    /// Pops the oldest item whose URL has not been visited yet
    ///
    /// The URL is marked visited as it is returned, so a URL queued several times is
    /// handed out once. Already-visited items are discarded and counted.
    pub fn next_url(&mut self) -> Option<CrawlItem> {
        while let Some(item) = self.queue.pop_front() {
            if self.visited.insert(item.url.as_str().to_string()) {
                return Some(item);
            }

            tracing::trace!("Skipping already visited {}", item.url);
            self.revisits_skipped += 1;
        }

        None
    }

    /// Returns true if the URL has already been dequeued
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Items waiting in the queue, duplicates included
    pub fn frontier_size(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn revisits_skipped(&self) -> u64 {
        self.revisits_skipped
    }

    /// Iterates the pending items in dequeue order
    pub fn pending(&self) -> impl Iterator<Item = &CrawlItem> {
        self.queue.iter()
    }
}

/// Resolves the initial crawl items
///
/// Each seed (path or absolute URL) is resolved against `root`. Seeds that fall outside
/// the mirrored host are dropped with a warning. With no seeds at all, the normalized
/// root is the only item.
///
/// # Arguments
///
/// * `root` - The base URL of the mirror
/// * `allowed_authority` - `host[:port]` of the base URL
/// * `seeds` - Entries read from the seed list file
pub fn seed_items(root: &Url, allowed_authority: &str, seeds: &[String]) -> Vec<CrawlItem> {
    if seeds.is_empty() {
        return resolve_candidate(root, allowed_authority, root.as_str())
            .map(CrawlItem::seed)
            .into_iter()
            .collect();
    }

    seeds
        .iter()
        .filter_map(|seed| match resolve_candidate(root, allowed_authority, seed) {
            Some(url) => Some(CrawlItem::seed(url)),
            None => {
                tracing::warn!("Ignoring seed outside {}: {}", allowed_authority, seed);
                None
            }
        })
        .collect()
}
