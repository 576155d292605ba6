use url::Url;

/// Returns the authority (`host[:port]`) of a URL
///
/// Default ports are already dropped by the `url` parser, so `https://example.com:443/`
/// and `https://example.com/` share the authority `example.com`. User info is never part
/// of the result.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_mirror::url::authority;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
