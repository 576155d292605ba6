//! Crawler module for fetching and walking a documentation site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with user agent, referer and deadlines
//! - HTML link extraction
//! - The breadth-first frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, FetchedResource, DEFAULT_CONTENT_TYPE};
pub use frontier::{seed_items, CrawlItem, Frontier};
pub use parser::{parse_html, ExtractedLink, LinkTag};

use crate::config::Config;
use crate::output::CrawlReport;

/// Runs a complete mirror operation
///
/// This is the main entry point for mirroring a site. It will:
/// 1. Validate the configuration and seed the frontier
/// 2. Build the HTTP client
/// 3. Fetch, write and convert every in-scope resource
/// 4. Return the run statistics
///
/// # Arguments
///
/// * `config` - The mirror configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Mirror completed (individual items may still have failed)
/// * `Err(MirrorError)` - Fatal configuration or output directory error
pub async fn mirror(config: Config) -> crate::Result<CrawlReport> {
    Coordinator::new(config)?.run().await
}
