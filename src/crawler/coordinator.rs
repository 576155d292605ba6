//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the mirroring process, including:
//! - Seeding the frontier from the base URL or a seed list
//! - Fetching and classifying each resource
//! - Writing (and optionally converting) it to the output directory
//! - Extracting and scoping links for the next round

use crate::config::{load_seed_paths, validate, validate_base_url, Config, OutputFormat};
use crate::crawler::frontier::{seed_items, CrawlItem, Frontier};
use crate::crawler::parser::{parse_html, ExtractedLink, LinkTag};
use crate::crawler::{build_http_client, fetch_url};
use crate::output::{convert, is_html, output_path, render_document, write_file, CrawlReport};
use crate::url::{authority, resolve_candidate};
use crate::{ConfigError, MirrorError};
use chrono::Utc;
use reqwest::Client;
use std::borrow::Cow;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns the frontier, the visited set and the HTTP client for one run.
pub struct Coordinator {
    config: Config,
    root: Url,
    authority: String,
    frontier: Frontier,
    client: Client,
    report: CrawlReport,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, reads the seed list (if any) and seeds the frontier.
    ///
    /// # Arguments
    ///
    /// * `config` - The mirror configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MirrorError)` - Invalid configuration, unreadable seed list, or client failure
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        validate(&config)?;

        let root = validate_base_url(&config.mirror.base_url)?;
        let authority = authority(&root).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("Base URL '{}' has no host", root))
        })?;

        let seeds = match &config.mirror.paths_file {
            Some(path) => {
                let seeds = load_seed_paths(path)?;
                tracing::info!("Loaded {} seed paths from {}", seeds.len(), path.display());
                seeds
            }
            None => Vec::new(),
        };

        let items = seed_items(&root, &authority, &seeds);
        if items.is_empty() {
            tracing::warn!("No seed URL is inside {}, nothing to mirror", authority);
        }

        let client = build_http_client(&config.user_agent, &config.fetch)?;

        Ok(Self {
            config,
            root,
            authority,
            frontier: Frontier::new(items),
            client,
            report: CrawlReport::default(),
        })
    }

    /// The normalized base URL
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// `host[:port]` every mirrored URL must share
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// URLs currently waiting in the frontier, in crawl order
    pub fn queued_urls(&self) -> Vec<Url> {
        self.frontier.pending().map(|item| item.url.clone()).collect()
    }

    /// Runs the main crawl loop until the frontier is drained
    ///
    /// Per-item failures are logged and counted; only failing to create the output
    /// directory aborts the run.
    pub async fn run(&mut self) -> Result<CrawlReport, MirrorError> {
        let output_dir = self.config.mirror.output_dir.clone();
        tokio::fs::create_dir_all(&output_dir).await?;

        tracing::info!(
            "Mirroring {} into {} ({} output)",
            self.root,
            output_dir.display(),
            self.config.mirror.format
        );

        let start_time = Instant::now();
        let mut items_processed: u64 = 0;

        while let Some(item) = self.frontier.next_url() {
            tracing::debug!("Processing URL: {}", item.url);

            self.process_item(&item).await;
            items_processed += 1;

            if items_processed % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = items_processed as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} items processed, {} in frontier, {:.2} items/sec",
                    items_processed,
                    self.frontier.frontier_size(),
                    rate
                );
            }
        }

        self.report.revisits_skipped = self.frontier.revisits_skipped();
        self.report.elapsed = start_time.elapsed();

        tracing::info!(
            "Mirror completed: {} saved, {} failed, {} visited in {:?}",
            self.report.pages_saved,
            self.report.total_failures(),
            self.frontier.visited_count(),
            self.report.elapsed
        );

        Ok(self.report.clone())
    }

    /// Fetches, persists and extracts links from a single item
    ///
    /// Failures are logged and counted against the report; none of them stop the run.
    async fn process_item(&mut self, item: &CrawlItem) {
        let fetched = match fetch_url(&self.client, &item.url, item.referer.as_ref()).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", item.url, e);
                self.report.fetch_failures += 1;
                return;
            }
        };

        let format = self.config.mirror.format;
        let output_dir = &self.config.mirror.output_dir;

        let path = match output_path(
            output_dir,
            &item.url,
            &self.authority,
            format,
            &fetched.content_type,
        ) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("No output path for {}: {}", item.url, e);
                self.report.write_failures += 1;
                return;
            }
        };

        let html = is_html(&fetched.content_type)
            .then(|| String::from_utf8_lossy(&fetched.body).into_owned());

        let contents: Cow<'_, [u8]> = match (&html, format) {
            (Some(html), OutputFormat::Markdown) => {
                let page = convert(&item.url, html);
                Cow::Owned(render_document(&item.url, &page, Utc::now()).into_bytes())
            }
            _ => Cow::Borrowed(fetched.body.as_slice()),
        };

        if let Err(e) = write_file(&path, &contents).await {
            tracing::warn!("Failed to write {}: {}", path.display(), e);
            self.report.write_failures += 1;
            return;
        }

        self.report.pages_saved += 1;
        self.report.bytes_written += contents.len() as u64;

        let relative = path.strip_prefix(output_dir).unwrap_or(&path);
        tracing::info!("Saved {} -> {}", item.url, relative.display());

        let Some(html) = html else {
            return;
        };

        match parse_html(&html) {
            Ok(links) => self.enqueue_links(&item.url, links),
            Err(message) => {
                let e = MirrorError::HtmlParse {
                    url: item.url.to_string(),
                    message,
                };
                tracing::warn!("{}", e);
                self.report.parse_failures += 1;
            }
        }
    }

    /// Scopes extracted links and queues the ones worth fetching
    ///
    /// # Filter Rules
    ///
    /// A link is dropped when:
    /// - it does not resolve to an `http(s)` URL on the mirrored authority
    /// - its URL has already been visited
    /// - the output is Markdown and the link comes from `<link>` or `<script>`
    /// - link following is disabled and the link comes from `<a>`
    fn enqueue_links(&mut self, page: &Url, links: Vec<ExtractedLink>) {
        let format = self.config.mirror.format;
        let follow_links = self.config.mirror.follow_links;
        let mut queued = 0usize;

        for link in links {
            if format == OutputFormat::Markdown
                && matches!(link.tag, LinkTag::Link | LinkTag::Script)
            {
                tracing::trace!("Skipping {:?} reference in markdown mode: {}", link.tag, link.reference);
                continue;
            }

            if !follow_links && link.tag == LinkTag::Anchor {
                tracing::trace!("Not following anchor: {}", link.reference);
                continue;
            }

            let Some(url) = resolve_candidate(page, &self.authority, &link.reference) else {
                tracing::trace!("Out of scope: {}", link.reference);
                continue;
            };

            if self.frontier.is_visited(&url) {
                continue;
            }

            self.frontier.push(CrawlItem {
                url,
                referer: Some(page.clone()),
            });
            queued += 1;
        }

        tracing::debug!("Queued {} links from {}", queued, page);
    }
}
