//! doc-mirror: an offline mirror for documentation sites
//!
//! This crate crawls a single documentation host breadth-first, writes every page and
//! asset it reaches into a local directory tree, and can convert HTML pages to Markdown
//! on the way.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for doc-mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Any of these aborts the run before the first fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Only HTTP and HTTPS URLs are supported, got: {0}")]
    UnsupportedScheme(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Unexpected host: {found} (expected {expected})")]
    HostMismatch { expected: String, found: String },
}

/// Result type alias for doc-mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use crawler::{mirror, Coordinator};
pub use output::{html_to_markdown, CrawlReport};
pub use url::{authority, resolve_candidate};
