//! Streaming HTML to Markdown conversion
//!
//! The converter never builds a DOM. It listens to the html5ever tokenizer and keeps a
//! small amount of state: the output buffer, a stack of open lists, a stack of open
//! anchors, a skip depth for `script`/`style` subtrees and the document title, and the
//! code flags.

use chrono::{DateTime, SecondsFormat, Utc};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::Attribute;
use url::Url;

/// Elements rendered as paragraphs
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "nav", "aside",
];

/// Result of converting one HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedPage {
    /// Document title with any trailing ` | Site` suffix removed
    pub title: Option<String>,

    /// Markdown body, ending in exactly one newline
    pub body: String,
}

/// Converts an HTML document into a Markdown file with a metadata header
///
/// The header records the page title (when the document has one), the source URL and
/// the current UTC time.
///
/// # Example
///
/// ```
/// use doc_mirror::output::html_to_markdown;
/// use url::Url;
///
/// let source = Url::parse("https://docs.example.com/").unwrap();
/// let doc = html_to_markdown(&source, "<h1>Intro</h1><p>Hi</p>");
/// assert!(doc.starts_with("---\nsource: https://docs.example.com/\n"));
/// assert!(doc.ends_with("---\n# Intro\n\nHi\n"));
/// ```
pub fn html_to_markdown(source: &Url, html: &str) -> String {
    let page = convert(source, html);
    render_document(source, &page, Utc::now())
}

/// Prepends the metadata header to a converted page
pub fn render_document(source: &Url, page: &ConvertedPage, downloaded: DateTime<Utc>) -> String {
    let mut doc = String::from("---\n");
    if let Some(title) = &page.title {
        doc.push_str(&format!("title: {}\n", title));
    }
    doc.push_str(&format!("source: {}\n", source));
    doc.push_str(&format!(
        "downloaded: {}\n",
        downloaded.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    doc.push_str("---\n");
    doc.push_str(&page.body);
    doc
}

/// Converts an HTML document into a Markdown body
///
/// Relative `href` and `src` values are resolved against `source`.
pub fn convert(source: &Url, html: &str) -> ConvertedPage {
    let mut tokenizer = Tokenizer::new(MarkdownWriter::new(source), TokenizerOpts::default());
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    tokenizer.sink.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug)]
struct ListContext {
    kind: ListKind,
    index: usize,
}

#[derive(Debug)]
struct AnchorContext {
    href: String,
    has_text: bool,
    /// Byte offset of the opening `[` in the output buffer
    start: usize,
}

struct MarkdownWriter<'a> {
    source: &'a Url,
    out: String,
    /// Character tokens not yet written; the tokenizer splits text arbitrarily
    pending_text: String,
    lists: Vec<ListContext>,
    anchors: Vec<AnchorContext>,
    skip_depth: usize,
    in_code_block: bool,
    inline_code: usize,
    title_text: Option<String>,
    in_title: bool,
    /// Set once the document title has been opened; later `<title>`s are body text
    title_seen: bool,
    svg_depth: usize,
}

impl<'a> MarkdownWriter<'a> {
    fn new(source: &'a Url) -> Self {
        Self {
            source,
            out: String::new(),
            pending_text: String::new(),
            lists: Vec::new(),
            anchors: Vec::new(),
            skip_depth: 0,
            in_code_block: false,
            inline_code: 0,
            title_text: None,
            in_title: false,
            title_seen: false,
            svg_depth: 0,
        }
    }

    fn finish(mut self) -> ConvertedPage {
        self.flush_text();
        ConvertedPage {
            title: self.title_text.as_deref().and_then(clean_title),
            body: format!("{}\n", self.out.trim_matches('\n')),
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn trailing_newlines(&self) -> usize {
        self.out.len() - self.out.trim_end_matches('\n').len()
    }

    /// Makes sure the buffer ends with at least `count` newlines
    ///
    /// Nothing is written into an empty buffer.
    fn ensure_newlines(&mut self, count: usize) {
        if self.out.is_empty() || count == 0 {
            return;
        }
        let have = self.trailing_newlines();
        if have < count {
            self.out.push_str(&"\n".repeat(count - have));
        }
    }

    /// Starts a new paragraph: exactly one blank line above it
    fn open_block(&mut self) {
        self.ensure_newlines(2);
        if !self.in_code_block {
            let excess = self.trailing_newlines().saturating_sub(2);
            self.out.truncate(self.out.len() - excess);
        }
    }

    fn resolve(&self, reference: &str) -> String {
        if reference.is_empty() {
            return String::new();
        }
        match self.source.join(reference) {
            Ok(url) => url.to_string(),
            Err(_) => reference.to_string(),
        }
    }

    fn mark_anchor_visible(&mut self) {
        if let Some(anchor) = self.anchors.last_mut() {
            anchor.has_text = true;
        }
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);

        if self.skip_depth > 0 {
            if self.in_title {
                self.title_text.get_or_insert_with(String::new).push_str(&text);
            }
            return;
        }

        let verbatim = self.in_code_block || self.inline_code > 0;
        let text = if verbatim {
            text
        } else {
            collapse_whitespace(&text)
        };

        let at_line_start = self.out.is_empty() || self.out.ends_with('\n');
        let text = if !verbatim && at_line_start {
            text.trim_start().to_string()
        } else {
            text
        };
        if text.is_empty() {
            return;
        }
        if !text.trim().is_empty() {
            self.mark_anchor_visible();
        }
        self.write(&text);
    }

    fn handle_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        match tag.kind {
            TagKind::StartTag => {
                let raw = self.start_tag(&tag.name, &tag.attrs);
                if tag.self_closing {
                    self.end_tag(&tag.name);
                    return TokenSinkResult::Continue;
                }
                match raw {
                    Some(kind) => TokenSinkResult::RawData(kind),
                    None => TokenSinkResult::Continue,
                }
            }
            TagKind::EndTag => {
                self.end_tag(&tag.name);
                TokenSinkResult::Continue
            }
        }
    }

    /// Handles an opening tag; returns the raw text mode for skipped elements
    fn start_tag(&mut self, name: &str, attrs: &[Attribute]) -> Option<RawKind> {
        if name == "title" {
            if self.skip_depth > 0 || self.svg_depth > 0 || self.title_seen {
                return None;
            }
            self.title_seen = true;
            self.in_title = true;
            self.skip_depth += 1;
            return Some(RawKind::Rcdata);
        }
        if let Some(kind) = skipped_content(name) {
            self.skip_depth += 1;
            return Some(kind);
        }
        if self.skip_depth > 0 {
            return None;
        }

        if BLOCK_ELEMENTS.contains(&name) {
            self.open_block();
        } else if let Some(level) = heading_level(name) {
            self.ensure_newlines(2);
            self.write(&format!("{} ", "#".repeat(level)));
        } else {
            match name {
                "br" => self.write("  \n"),
                "strong" | "b" => self.write("**"),
                "em" | "i" => self.write("*"),
                "code" => {
                    if !self.in_code_block {
                        self.inline_code += 1;
                        self.write("`");
                    }
                }
                "pre" => {
                    self.ensure_newlines(2);
                    self.write("```\n");
                    self.in_code_block = true;
                }
                "ul" | "ol" => {
                    self.ensure_newlines(2);
                    let kind = if name == "ol" {
                        ListKind::Ordered
                    } else {
                        ListKind::Unordered
                    };
                    self.lists.push(ListContext { kind, index: 0 });
                }
                "li" => self.open_list_item(),
                "a" => {
                    let href = self.resolve(attr(attrs, "href").unwrap_or_default());
                    self.anchors.push(AnchorContext {
                        href,
                        has_text: false,
                        start: self.out.len(),
                    });
                    self.write("[");
                }
                "img" => {
                    let alt = attr(attrs, "alt").unwrap_or_default();
                    let src = self.resolve(attr(attrs, "src").unwrap_or_default());
                    self.write(&format!("![{}]({})", alt, src));
                    self.mark_anchor_visible();
                }
                "blockquote" => {
                    self.open_block();
                    self.write("> ");
                }
                "svg" => self.svg_depth += 1,
                _ => {}
            }
        }
        None
    }

    fn open_list_item(&mut self) {
        let depth = self.lists.len();
        let Some(list) = self.lists.last_mut() else {
            return;
        };
        let marker = match list.kind {
            ListKind::Ordered => {
                list.index += 1;
                format!("{}. ", list.index)
            }
            ListKind::Unordered => "- ".to_string(),
        };
        self.ensure_newlines(1);
        self.write(&"  ".repeat(depth - 1));
        self.write(&marker);
    }

    fn end_tag(&mut self, name: &str) {
        if name == "title" {
            if self.in_title {
                self.in_title = false;
                self.skip_depth = self.skip_depth.saturating_sub(1);
            }
            return;
        }
        if skipped_content(name).is_some() {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        if BLOCK_ELEMENTS.contains(&name) || heading_level(name).is_some() {
            self.ensure_newlines(2);
            return;
        }

        match name {
            "strong" | "b" => self.write("**"),
            "em" | "i" => self.write("*"),
            "code" => {
                if !self.in_code_block && self.inline_code > 0 {
                    self.write("`");
                    self.inline_code -= 1;
                }
            }
            "pre" => {
                if self.in_code_block {
                    self.ensure_newlines(1);
                    self.write("```\n");
                    self.ensure_newlines(2);
                    self.in_code_block = false;
                }
            }
            "ul" | "ol" => {
                self.lists.pop();
                self.ensure_newlines(2);
            }
            "li" => self.ensure_newlines(1),
            "a" => self.close_anchor(),
            "blockquote" => self.ensure_newlines(2),
            "svg" => self.svg_depth = self.svg_depth.saturating_sub(1),
            _ => {}
        }
    }

    /// Closes the innermost anchor
    ///
    /// An anchor that never received visible content is rolled back to its opening
    /// position and replaced by an autolink.
    fn close_anchor(&mut self) {
        let Some(anchor) = self.anchors.pop() else {
            return;
        };
        if anchor.has_text {
            self.write(&format!("]({})", anchor.href));
        } else {
            if anchor.start < self.out.len() {
                self.out.truncate(anchor.start);
            }
            self.write(&format!("<{}>", anchor.href));
        }
    }
}

impl TokenSink for MarkdownWriter<'_> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => {
                self.pending_text.push_str(&text);
                TokenSinkResult::Continue
            }
            Token::TagToken(tag) => {
                self.flush_text();
                self.handle_tag(tag)
            }
            Token::NullCharacterToken | Token::ParseError(_) => TokenSinkResult::Continue,
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text();
                TokenSinkResult::Continue
            }
        }
    }
}

/// Raw text mode for elements whose content never reaches the body
fn skipped_content(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        _ => None,
    }
}

/// Heading level for `h<digit>` tags, clamped to 1..=6
fn heading_level(name: &str) -> Option<usize> {
    let digit = name.strip_prefix('h')?;
    if digit.len() != 1 {
        return None;
    }
    let level: usize = digit.parse().ok()?;
    Some(level.clamp(1, 6))
}

fn attr<'t>(attrs: &'t [Attribute], name: &str) -> Option<&'t str> {
    attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| &*a.value)
}

/// Collapses every whitespace run (NBSP included) into a single space
fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                collapsed.push(' ');
            }
            in_run = true;
        } else {
            collapsed.push(c);
            in_run = false;
        }
    }
    collapsed
}

/// Trims a raw `<title>` and drops a trailing ` | Site name` suffix
fn clean_title(raw: &str) -> Option<String> {
    let title = raw.trim();
    let mut end = title.len();
    for (idx, _) in title.match_indices('|') {
        let before = &title[..idx];
        if before.ends_with(char::is_whitespace) {
            end = before.trim_end().len();
            break;
        }
    }
    let title = title[..end].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
