use crate::text::{
    Diagnostic, DiagnosticPhase, FormattingSpan, OffsetAttribute, OffsetCorrection, Severity,
};
use serde::{Deserialize, Serialize};

/// A unit of readable text plus the inline formatting spans laid over it.
///
/// This is the contract between the HTML extractor and everything downstream
/// (the Markdown renderer here, readability/style tooling elsewhere): a flat
/// string with no markup, and an ordered span collection describing which
/// byte ranges carried which formatting.
///
/// Construction is the only point where offsets are touched. Upstream
/// extraction can hand us spans whose offsets run past the end of the text
/// (trimmed trailing separators, concatenation artifacts); rather than fail,
/// the constructor clamps such an offset to the text's byte length and
/// records a [`Diagnostic`] so the data-quality problem stays visible.
///
/// Fields are private: consumers get read access via [`text`](Self::text)
/// and [`formatting`](Self::formatting), and nothing mutates the value after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextWithFormatting {
    text: String,
    formatting: Vec<FormattingSpan>,
}

impl TextWithFormatting {
    /// Build the entity, healing out-of-range offsets.
    ///
    /// For `start_index` and independently for `end_index`, the first span
    /// (in collection order) whose value exceeds `text.len()` is clamped to
    /// exactly `text.len()`, and one `Warning` diagnostic is pushed into
    /// `diagnostics`. Later offenders for the same attribute are left as-is;
    /// callers that need full sanitization must not rely on this pass.
    ///
    /// The span vector is taken by value, so the constructed entity owns its
    /// spans exclusively and never mutates caller-visible data.
    pub fn new(
        text: String,
        formatting: Vec<FormattingSpan>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut this = Self { text, formatting };
        this.clamp_first_offender(OffsetAttribute::StartIndex, diagnostics);
        this.clamp_first_offender(OffsetAttribute::EndIndex, diagnostics);
        this
    }

    /// The extracted plain text. No markup, offsets index into this.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Formatting spans in the order the extractor produced them.
    #[inline]
    pub fn formatting(&self) -> &[FormattingSpan] {
        &self.formatting
    }

    /// Consume the entity, yielding its parts.
    pub fn into_parts(self) -> (String, Vec<FormattingSpan>) {
        (self.text, self.formatting)
    }

    /// Clamp the first span whose `attribute` offset exceeds the text's byte
    /// length, and record the correction. At most one span is touched per
    /// call.
    fn clamp_first_offender(
        &mut self,
        attribute: OffsetAttribute,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let len = self.text.len() as u64;

        let Some(span) = self.formatting.iter_mut().find(|s| match attribute {
            OffsetAttribute::StartIndex => s.start_index > len,
            OffsetAttribute::EndIndex => s.end_index > len,
        }) else {
            return;
        };

        let old_value = match attribute {
            OffsetAttribute::StartIndex => std::mem::replace(&mut span.start_index, len),
            OffsetAttribute::EndIndex => std::mem::replace(&mut span.end_index, len),
        };

        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            phase: Some(DiagnosticPhase::Bounds),
            code: Some("formatting.offset_out_of_bounds".to_string()),
            message: format!(
                "formatting span `{}`: {} {} exceeds text length {}; set to the end of the text",
                span.tag,
                attribute.name(),
                old_value,
                len
            ),
            tag: Some(span.tag.clone()),
            correction: Some(OffsetCorrection {
                attribute,
                old_value,
                new_value: len,
            }),
            notes: vec![],
        });
    }
}
