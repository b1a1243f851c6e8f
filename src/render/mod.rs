//! [`TextWithFormatting`] -> Markdown renderer.
//!
//! This module intentionally operates **only** on the extracted entity
//! (typically loaded from JSON) and does not inspect raw `.html` text.
//!
//! Rendering is best-effort: the entity only guarantees bounds for the first
//! corrected span per offset attribute, so any span the renderer cannot
//! place (inverted, out of bounds, off a char boundary) is skipped rather
//! than panicking.

use crate::text::{FormattingSpan, TextWithFormatting};

/// Rendering options that control formatting decisions.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// If true, render link spans as `[label](target)`; if false, emit just
    /// the label text.
    pub include_link_targets: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_link_targets: true,
        }
    }
}

pub fn render_text(text: &TextWithFormatting) -> String {
    render_text_with_options(text, &RenderOptions::default())
}

pub fn render_text_with_options(text: &TextWithFormatting, opts: &RenderOptions) -> String {
    // marker insertions, sorted by position with closing markers ahead of
    // opening markers at the same offset. at equal positions, outer spans
    // open first and inner spans close first, so properly nested spans
    // render as properly nested markers.
    let mut inserts: Vec<Insert> = Vec::new();

    for (index, span) in text.formatting().iter().enumerate() {
        if !placeable(span, text.text()) || span.is_empty() {
            continue;
        }
        let Some((open, close)) = markers(span, opts) else {
            continue;
        };

        let start = span.start_index as usize;
        let end = span.end_index as usize;
        if !open.is_empty() {
            inserts.push(Insert {
                pos: start,
                kind: InsertKind::Open,
                order: (-(end as i64), -(index as i64)),
                marker: open,
            });
        }
        if !close.is_empty() {
            inserts.push(Insert {
                pos: end,
                kind: InsertKind::Close,
                order: (-(start as i64), index as i64),
                marker: close,
            });
        }
    }

    inserts.sort_by(|a, b| (a.pos, a.kind, a.order).cmp(&(b.pos, b.kind, b.order)));

    let src = text.text();
    let mut out = String::with_capacity(src.len() + inserts.len() * 2);
    let mut last = 0;
    for ins in &inserts {
        out.push_str(&src[last..ins.pos]);
        out.push_str(&ins.marker);
        last = ins.pos;
    }
    out.push_str(&src[last..]);

    // trim trailing whitespace/newlines for stable output.
    while matches!(out.as_bytes().last(), Some(b'\n' | b' ' | b'\t' | b'\r')) {
        out.pop();
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum InsertKind {
    Close,
    Open,
}

#[derive(Debug)]
struct Insert {
    pos: usize,
    kind: InsertKind,
    order: (i64, i64),
    marker: String,
}

fn placeable(span: &FormattingSpan, text: &str) -> bool {
    let start = span.start_index as usize;
    let end = span.end_index as usize;
    start <= end && end <= text.len() && text.is_char_boundary(start) && text.is_char_boundary(end)
}

/// Opening/closing markers for a span, or `None` to render its text plain.
fn markers(span: &FormattingSpan, opts: &RenderOptions) -> Option<(String, String)> {
    let pair = |open: &str, close: &str| Some((open.to_string(), close.to_string()));
    match span.tag.as_str() {
        "strong" => pair("**", "**"),
        "em" => pair("*", "*"),
        "code" => pair("`", "`"),
        "strike" => pair("~~", "~~"),
        // no Markdown equivalents; pass through as inline HTML.
        "u" => pair("<u>", "</u>"),
        "mark" => pair("<mark>", "</mark>"),
        "sub" => pair("<sub>", "</sub>"),
        "sup" => pair("<sup>", "</sup>"),
        "pre" => pair("```\n", "\n```"),
        "link" => {
            if !opts.include_link_targets {
                return None;
            }
            let href = span.attributes.get("href")?;
            Some(("[".to_string(), format!("]({})", href)))
        }
        "h1" => pair("# ", ""),
        "h2" => pair("## ", ""),
        "h3" => pair("### ", ""),
        "h4" => pair("#### ", ""),
        "h5" => pair("##### ", ""),
        "h6" => pair("###### ", ""),
        _ => None,
    }
}
