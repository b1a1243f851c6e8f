use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic emitted by the extractor or by bounds
/// correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// The phase that produced the diagnostic.
///
/// Optional on [`Diagnostic`] so callers can log diagnostics even if they do
/// not distinguish phases yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPhase {
    Extract,
    Bounds,
}

/// Which offset attribute of a [`FormattingSpan`] a correction applied to.
///
/// [`FormattingSpan`]: crate::text::FormattingSpan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetAttribute {
    StartIndex,
    EndIndex,
}

impl OffsetAttribute {
    /// Attribute name as it appears in messages and JSON.
    pub fn name(self) -> &'static str {
        match self {
            OffsetAttribute::StartIndex => "start_index",
            OffsetAttribute::EndIndex => "end_index",
        }
    }
}

/// A structured record of one offset clamp, kept alongside the
/// human-readable message so telemetry does not have to re-parse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetCorrection {
    /// Which offset attribute was clamped.
    pub attribute: OffsetAttribute,

    /// Value as received from upstream.
    pub old_value: u64,

    /// Value after clamping (always the text's byte length).
    pub new_value: u64,
}

/// A structured diagnostic for debugging extraction/bounds issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Which phase produced this diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<DiagnosticPhase>,

    /// A stable identifier like `formatting.offset_out_of_bounds`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human readable message.
    pub message: String,

    /// Tag of the formatting span this diagnostic refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Present when the diagnostic records an offset clamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<OffsetCorrection>,

    /// Optional notes that can help explain recovery decisions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}
