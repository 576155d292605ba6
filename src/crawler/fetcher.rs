//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror, including:
//! - Building HTTP clients with a descriptive user agent and deadlines
//! - GET requests carrying the referring page
//! - Error classification (transport, status, timeout)

use crate::config::{FetchConfig, UserAgentConfig};
use crate::MirrorError;
use reqwest::header::{CONTENT_TYPE, REFERER};
use reqwest::Client;
use url::Url;

/// Content type assumed when the server does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Declared `Content-Type`, or [`DEFAULT_CONTENT_TYPE`]
    pub content_type: String,

    /// Raw response body
    pub body: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy.
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetch` - Request and connect deadlines
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use doc_mirror::config::{FetchConfig, UserAgentConfig};
/// use doc_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(fetch.timeout())
        .connect_timeout(fetch.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body and content type
///
/// # Failure Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Non-2xx status | `MirrorError::HttpStatus` |
/// | Request or connect deadline expired | `MirrorError::Timeout` |
/// | Any other transport error | `MirrorError::Http` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `referer` - Page the URL was discovered on, sent as `Referer`
pub async fn fetch_url(
    client: &Client,
    url: &Url,
    referer: Option<&Url>,
) -> Result<FetchedResource, MirrorError> {
    let mut request = client.get(url.as_str());
    if let Some(referer) = referer {
        request = request.header(REFERER, referer.as_str());
    }

    let response = request.send().await.map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let body = response
        .bytes()
        .await
        .map_err(|e| classify_error(url, e))?
        .to_vec();

    Ok(FetchedResource { content_type, body })
}

fn classify_error(url: &Url, error: reqwest::Error) -> MirrorError {
    if error.is_timeout() {
        MirrorError::Timeout {
            url: url.to_string(),
        }
    } else {
        MirrorError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
