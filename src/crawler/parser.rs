//! HTML parser for extracting link candidates
//!
//! The extractor only reports raw references and the tag they came from. Resolution and
//! scope checks happen in the coordinator, which knows the mirrored host.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Element a reference was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkTag {
    /// `<a href>`
    Anchor,
    /// `<link href>`
    Link,
    /// `<script src>`
    Script,
    /// `<img src>`
    Image,
}

impl LinkTag {
    fn from_element(name: &str) -> Option<Self> {
        match name {
            "a" => Some(Self::Anchor),
            "link" => Some(Self::Link),
            "script" => Some(Self::Script),
            "img" => Some(Self::Image),
            _ => None,
        }
    }

    fn attribute(self) -> &'static str {
        match self {
            Self::Anchor | Self::Link => "href",
            Self::Script | Self::Image => "src",
        }
    }
}

/// A raw reference and the tag it was found on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedLink {
    /// Attribute value, trimmed but otherwise unresolved
    pub reference: String,
    pub tag: LinkTag,
}

/// Parses HTML content and extracts link candidates
///
/// # Extraction Rules
///
/// - `href` of `<a>` and `<link>`
/// - `src` of `<script>` and `<img>`
/// - Empty values are skipped
/// - Identical (reference, tag) pairs are reported once, in document order
///
/// The parser recovers from malformed markup, so in practice this never fails.
///
/// # Example
///
/// ```
/// use doc_mirror::crawler::{parse_html, LinkTag};
///
/// let html = r#"<a href="/guide">Guide</a><img src="/logo.png"><a href="/guide">Again</a>"#;
/// let links = parse_html(html).unwrap();
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].reference, "/guide");
/// assert_eq!(links[1].tag, LinkTag::Image);
/// ```
pub fn parse_html(html: &str) -> Result<Vec<ExtractedLink>, String> {
    let document = Html::parse_document(html);

    let selector = Selector::parse("a[href], link[href], script[src], img[src]")
        .map_err(|e| format!("Invalid link selector: {:?}", e))?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(tag) = LinkTag::from_element(element.value().name()) else {
            continue;
        };

        let Some(reference) = element.value().attr(tag.attribute()).map(str::trim) else {
            continue;
        };

        if reference.is_empty() {
            continue;
        }

        let link = ExtractedLink {
            reference: reference.to_string(),
            tag,
        };

        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    Ok(links)
}
