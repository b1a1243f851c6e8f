//! Extracted text, formatting spans, and the JSON envelope.
//!
//! This module defines the **contract** between:
//! 1) extracting `.html` source -> [`TextWithFormatting`], and
//! 2) consuming that entity (Markdown rendering here, analysis elsewhere).
//!
//! Design goals:
//! - A flat, markup-free text string with span overlays for inline
//!   formatting.
//! - Stable JSON representation for on-disk inspection.
//! - Out-of-range span offsets are healed at construction and surfaced as
//!   structured diagnostics instead of crashing the pipeline or being
//!   silently absorbed.

mod diagnostic;
mod envelope;
mod formatted;
mod span;

pub use diagnostic::*;
pub use envelope::*;
pub use formatted::*;
pub use span::*;

/// JSON schema version for the text envelope.
///
/// Bump this when making non-backwards-compatible changes to the JSON structure.
pub const SCHEMA_VERSION: u32 = 1;

/// The extractor name stored in the JSON envelope.
pub const EXTRACTOR_NAME: &str = "html2prose";

/// The extractor version stored in the JSON envelope.
pub const EXTRACTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textfile_json_round_trip() {
        let mut diagnostics = Vec::new();
        let text = TextWithFormatting::new(
            "This text is very strong.".to_string(),
            vec![
                FormattingSpan::new("strong", 18, 24).with_attribute("id", "elem-id"),
                FormattingSpan::new("link", 5, 9).with_attribute("href", "/text"),
            ],
            &mut diagnostics,
        );

        let file = TextFile {
            schema_version: SCHEMA_VERSION,
            extractor: ExtractorInfo {
                name: EXTRACTOR_NAME.to_string(),
                version: EXTRACTOR_VERSION.to_string(),
            },
            offset_encoding: OffsetEncoding::default(),
            document_id: "Very_Strong".to_string(),
            source: SourceInfo {
                path: Some("docs/html/v/Very_Strong.html".to_string()),
                md5: None,
                byte_len: 120,
            },
            title: Some("Very Strong".to_string()),
            diagnostics: vec![Diagnostic {
                severity: Severity::Info,
                phase: Some(DiagnosticPhase::Extract),
                code: Some("example".to_string()),
                message: "example diagnostic".to_string(),
                tag: Some("strong".to_string()),
                correction: Some(OffsetCorrection {
                    attribute: OffsetAttribute::EndIndex,
                    old_value: 99,
                    new_value: 25,
                }),
                notes: vec!["note".to_string()],
            }],
            text,
        };

        let json = serde_json::to_string_pretty(&file).expect("serialize");
        let back: TextFile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(file, back);
    }
}
