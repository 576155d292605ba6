//! Output module: everything that turns a fetched resource into a file
//!
//! This module handles:
//! - Mapping canonical URLs to paths inside the output directory
//! - Converting HTML documents to Markdown
//! - Writing files, creating parent directories as needed
//! - Summarizing a crawl run

pub mod markdown;
mod path;
pub mod stats;
mod writer;

pub use markdown::{convert, html_to_markdown, render_document, ConvertedPage};
pub use path::output_path;
pub use stats::{print_report, CrawlReport};
pub use writer::write_file;

/// Returns true if a `Content-Type` value denotes an HTML document
///
/// Only `text/html` counts; parameters such as `charset` are ignored and the comparison
/// is case-insensitive.
///
/// # Example
///
/// ```
/// use doc_mirror::output::is_html;
///
/// assert!(is_html("text/html; charset=utf-8"));
/// assert!(!is_html("application/xhtml+xml"));
/// ```
pub fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .eq_ignore_ascii_case("text/html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("TEXT/HTML"));
        assert!(is_html(" text/html ; charset=UTF-8"));

        assert!(!is_html(""));
        assert!(!is_html("text/plain"));
        assert!(!is_html("text/html5"));
        assert!(!is_html("application/octet-stream"));
    }
}
