//! HTML -> [`TextWithFormatting`] extractor.
//!
//! The extractor is intentionally **error-tolerant**: html5ever recovers
//! from malformed markup, and anything questionable in the input becomes a
//! [`Diagnostic`] rather than a failure. It produces:
//! - A flat, markup-free text string (whitespace collapsed, block elements
//!   separated by blank lines).
//! - Formatting spans with byte offsets into that text for inline elements
//!   (`strong`, `em`, links, `code`, ...), plus heading and `pre` spans.
//!
//! Span offsets are recorded during the tree walk, and the trailing
//! separator whitespace is trimmed afterwards. Offsets that pointed into the
//! trimmed tail are healed by [`TextWithFormatting::new`], which is also
//! where the matching diagnostics come from.

use crate::text::{
    Diagnostic, DiagnosticPhase, FormattingSpan, Severity, TextWithFormatting,
};
use scraper::{ElementRef, Html, Node};

/// Result of extracting a document.
#[derive(Debug, Clone)]
pub struct ExtractOutput {
    pub text: TextWithFormatting,
    /// Document title from `<title>`, falling back to the first `<h1>`.
    pub title: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Length of the source HTML in bytes.
    pub byte_len: usize,
}

/// Extract readable text and formatting spans from an HTML document.
///
/// Never fails; data-quality issues surface through
/// [`ExtractOutput::diagnostics`].
pub fn extract_document(html: &str) -> ExtractOutput {
    let document = Html::parse_document(html);

    let mut walker = Walker::default();
    // prefer the body; fall back to the root for fragments html5ever did not
    // wrap the way we expect.
    let start = find_first_element(&document, "body").unwrap_or_else(|| document.root_element());
    walker.walk_children(start);

    let title = document_title(&document);

    let mut text = walker.text;
    let mut diagnostics = walker.diagnostics;

    // trim the separator tail; spans that ended inside it now run past the
    // text and get healed (and reported) by the constructor.
    text.truncate(text.trim_end().len());

    let text = TextWithFormatting::new(text, walker.spans, &mut diagnostics);

    ExtractOutput {
        text,
        title,
        diagnostics,
        byte_len: html.len(),
    }
}

fn find_first_element<'a>(document: &'a Html, name: &str) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == name)
}

fn document_title(document: &Html) -> Option<String> {
    for name in ["title", "h1"] {
        if let Some(el) = find_first_element(document, name) {
            let raw: String = el.text().collect();
            let title = collapse_whitespace(&raw);
            if !title.is_empty() {
                return Some(title);
            }
        }
    }
    None
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Separator owed to the flat text before the next visible character.
///
/// Separators are flushed lazily so the text never accumulates leading or
/// doubled whitespace; ordering lets a paragraph break win over a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
enum Pending {
    #[default]
    None,
    Space,
    Line,
    Paragraph,
}

#[derive(Debug, Default)]
struct Walker {
    text: String,
    spans: Vec<FormattingSpan>,
    diagnostics: Vec<Diagnostic>,
    pending: Pending,
    /// Nesting depth of `<pre>`; verbatim text while > 0.
    preformatted: u32,
}

impl Walker {
    fn walk_children(&mut self, el: ElementRef<'_>) {
        for child in el.children() {
            match child.value() {
                Node::Text(t) => self.push_text(t),
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        self.visit_element(child_el);
                    }
                }
                // comments, doctypes, processing instructions carry no prose.
                _ => {}
            }
        }
    }

    fn visit_element(&mut self, el: ElementRef<'_>) {
        let name = el.value().name();

        if is_skipped(name) {
            return;
        }

        match name {
            "br" => {
                self.request(Pending::Line);
                return;
            }
            "hr" => {
                self.request(Pending::Paragraph);
                return;
            }
            _ => {}
        }

        let block_sep = block_separator(name);
        if let Some(sep) = block_sep {
            self.request(sep);
        }

        let span_tag = span_tag(name);
        let span_start = span_tag.map(|tag| {
            // the pending separator is not part of the span; flush it so the
            // recorded start points at the span's first visible character.
            self.flush_pending();
            (tag, self.text.len() as u64)
        });

        if name == "a" && el.value().attr("href").is_none() {
            self.diagnostics.push(Diagnostic {
                severity: Severity::Info,
                phase: Some(DiagnosticPhase::Extract),
                code: Some("extract.link.missing_href".to_string()),
                message: "anchor element without href; span recorded without a target".to_string(),
                tag: Some("link".to_string()),
                correction: None,
                notes: vec![],
            });
        }

        if name == "pre" {
            self.preformatted += 1;
        }
        self.walk_children(el);
        if name == "pre" {
            self.preformatted -= 1;
        }

        if let Some((tag, start_index)) = span_start {
            let end_index = self.text.len() as u64;
            // spans that cover no visible text are dropped.
            if end_index > start_index {
                let mut span = FormattingSpan::new(tag, start_index, end_index);
                for attr in ["href", "id", "title", "class"] {
                    if let Some(value) = el.value().attr(attr) {
                        span.attributes.insert(attr.to_string(), value.to_string());
                    }
                }
                self.spans.push(span);
            }
        }

        if let Some(sep) = block_sep {
            self.request(sep);
        }
    }

    fn push_text(&mut self, raw: &str) {
        if self.preformatted > 0 {
            if !raw.is_empty() {
                self.flush_pending();
                self.text.push_str(raw);
            }
            return;
        }

        for ch in raw.chars() {
            if ch.is_whitespace() {
                self.request(Pending::Space);
            } else {
                self.flush_pending();
                self.text.push(ch);
            }
        }
    }

    fn request(&mut self, sep: Pending) {
        self.pending = self.pending.max(sep);
    }

    fn flush_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        // nothing to separate at the very start of the text.
        if self.text.is_empty() {
            return;
        }
        match pending {
            Pending::None => {}
            Pending::Space => {
                if !self.text.ends_with(char::is_whitespace) {
                    self.text.push(' ');
                }
            }
            Pending::Line => self.text.push('\n'),
            Pending::Paragraph => self.text.push_str("\n\n"),
        }
    }
}

fn is_skipped(name: &str) -> bool {
    matches!(
        name,
        "script" | "style" | "noscript" | "template" | "iframe" | "svg" | "head"
    )
}

/// Separator owed before and after a block-level element, if any.
fn block_separator(name: &str) -> Option<Pending> {
    match name {
        "p" | "div" | "section" | "article" | "main" | "header" | "footer" | "aside" | "nav"
        | "ul" | "ol" | "table" | "blockquote" | "figure" | "figcaption" | "dl" | "pre"
        | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(Pending::Paragraph),
        "li" | "tr" | "dt" | "dd" | "caption" => Some(Pending::Line),
        "td" | "th" => Some(Pending::Space),
        _ => None,
    }
}

/// Span tag recorded for an element, if it is a formatting element.
fn span_tag(name: &str) -> Option<&'static str> {
    match name {
        "strong" | "b" => Some("strong"),
        "em" | "i" => Some("em"),
        "a" => Some("link"),
        "code" => Some("code"),
        "u" => Some("u"),
        "s" | "del" | "strike" => Some("strike"),
        "mark" => Some("mark"),
        "sub" => Some("sub"),
        "sup" => Some("sup"),
        "pre" => Some("pre"),
        "h1" => Some("h1"),
        "h2" => Some("h2"),
        "h3" => Some("h3"),
        "h4" => Some("h4"),
        "h5" => Some("h5"),
        "h6" => Some("h6"),
        _ => None,
    }
}
