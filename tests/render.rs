//! Renderer behavior on hand-built entities, including ones where the
//! single-offender bounds healing left later spans out of range.

use html2prose::render::{RenderOptions, render_text, render_text_with_options};
use html2prose::text::{Diagnostic, FormattingSpan, TextWithFormatting};

fn entity(text: &str, spans: Vec<FormattingSpan>) -> (TextWithFormatting, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let entity = TextWithFormatting::new(text.to_string(), spans, &mut diagnostics);
    (entity, diagnostics)
}

#[test]
fn basic_markers() {
    let (text, _) = entity(
        "bold em code strike",
        vec![
            FormattingSpan::new("strong", 0, 4),
            FormattingSpan::new("em", 5, 7),
            FormattingSpan::new("code", 8, 12),
            FormattingSpan::new("strike", 13, 19),
        ],
    );
    assert_eq!(render_text(&text), "**bold** *em* `code` ~~strike~~");
}

#[test]
fn heading_prefix_and_inline_html_passthrough() {
    let (text, _) = entity(
        "Title\n\nunderlined marked",
        vec![
            FormattingSpan::new("h3", 0, 5),
            FormattingSpan::new("u", 7, 17),
            FormattingSpan::new("mark", 18, 24),
        ],
    );
    assert_eq!(
        render_text(&text),
        "### Title\n\n<u>underlined</u> <mark>marked</mark>"
    );
}

#[test]
fn unhealed_second_offender_is_skipped_not_a_panic() {
    // two spans end past the text; only the first is healed at construction.
    let (text, diagnostics) = entity(
        "abc",
        vec![
            FormattingSpan::new("strong", 0, 50),
            FormattingSpan::new("em", 1, 60),
        ],
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(text.formatting()[1].end_index, 60);

    // the renderer places the healed span and silently drops the broken one.
    assert_eq!(render_text(&text), "**abc**");
}

#[test]
fn inverted_and_mid_char_spans_are_skipped() {
    // "héllo": é is two bytes, so offset 2 is not a char boundary.
    let (text, _) = entity(
        "héllo",
        vec![
            FormattingSpan::new("strong", 4, 1),
            FormattingSpan::new("em", 2, 6),
        ],
    );
    assert_eq!(render_text(&text), "héllo");
}

#[test]
fn link_without_href_renders_plain() {
    let (text, _) = entity("go home", vec![FormattingSpan::new("link", 3, 7)]);
    assert_eq!(render_text(&text), "go home");
}

#[test]
fn pre_span_renders_as_fenced_block() {
    let (text, _) = entity(
        "intro\n\nlet x = 1;",
        vec![FormattingSpan::new("pre", 7, 17)],
    );
    assert_eq!(render_text(&text), "intro\n\n```\nlet x = 1;\n```");
}

#[test]
fn adjacent_spans_close_before_opening() {
    let (text, _) = entity(
        "onetwo",
        vec![
            FormattingSpan::new("strong", 0, 3),
            FormattingSpan::new("em", 3, 6),
        ],
    );
    assert_eq!(render_text(&text), "**one***two*");
}

#[test]
fn options_suppress_link_targets() {
    let (text, _) = entity(
        "a link here",
        vec![FormattingSpan::new("link", 2, 6).with_attribute("href", "https://e.org")],
    );
    assert_eq!(render_text(&text), "a [link](https://e.org) here");
    assert_eq!(
        render_text_with_options(
            &text,
            &RenderOptions {
                include_link_targets: false
            }
        ),
        "a link here"
    );
}
