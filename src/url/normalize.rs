use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use super::authority;

/// Characters left as-is when encoding a path
///
/// `%` is part of the set so that already-encoded octets are never encoded twice.
const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'%');

/// Percent-encodes a URL path while keeping already-encoded segments intact
///
/// An empty path becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };
    utf8_percent_encode(path, PATH_SAFE).to_string()
}

/// Resolves a candidate reference into a canonical URL on the mirrored host
///
/// # Resolution Steps
///
/// 1. Join the candidate onto `base` (absolute, scheme-relative and relative forms)
/// 2. Reject anything that is not `http` or `https`
/// 3. Reject anything whose authority is not `allowed_authority`, or that carries user info
/// 4. Drop the query string and fragment
/// 5. Percent-normalize the path
///
/// Returns `None` for every rejection; out-of-scope links are not errors.
///
/// # Examples
///
/// ```
/// use doc_mirror::url::resolve_candidate;
/// use url::Url;
///
/// let base = Url::parse("https://docs.example.com/guide/intro").unwrap();
/// let url = resolve_candidate(&base, "docs.example.com", "setup?tab=1#top").unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/guide/setup");
///
/// assert!(resolve_candidate(&base, "docs.example.com", "https://other.com/").is_none());
/// assert!(resolve_candidate(&base, "docs.example.com", "mailto:a@b.c").is_none());
/// ```
pub fn resolve_candidate(base: &Url, allowed_authority: &str, candidate: &str) -> Option<Url> {
    let mut resolved = base.join(candidate).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if authority(&resolved)? != allowed_authority {
        return None;
    }

    if !resolved.username().is_empty() || resolved.password().is_some() {
        return None;
    }

    let normalized_path = normalize_path(resolved.path());
    resolved.set_query(None);
    resolved.set_fragment(None);
    resolved.set_path(&normalized_path);

    Some(resolved)
}
