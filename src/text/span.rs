use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An inline formatting range over the **extracted** plain text.
///
/// Offsets are measured in bytes (UTF-8) into [`TextWithFormatting::text`].
/// This is deliberate:
/// - It matches Rust string indexing constraints.
/// - It stays stable even when the text contains multi-byte Unicode.
///
/// The extractor produces half-open `[start_index, end_index)` ranges, but
/// nothing in this module interprets that relation: consumers own the
/// semantics, this crate only bounds the numeric values.
///
/// [`TextWithFormatting::text`]: crate::text::TextWithFormatting::text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingSpan {
    /// Formatting kind, e.g. `"strong"`, `"em"`, `"link"`, `"h2"`.
    ///
    /// Opaque to this module; it only appears in diagnostics here.
    pub tag: String,

    /// Inclusive start byte offset into the extracted text.
    pub start_index: u64,

    /// End byte offset into the extracted text.
    pub end_index: u64,

    /// Attributes carried over from the source element (`href`, `id`, ...).
    ///
    /// A `BTreeMap` keeps the JSON representation stable and diffable.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl FormattingSpan {
    #[inline]
    pub fn new(tag: impl Into<String>, start_index: u64, end_index: u64) -> Self {
        Self {
            tag: tag.into(),
            start_index,
            end_index,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Byte length of the covered range (saturating; `end < start` yields 0).
    #[inline]
    pub fn len(&self) -> u64 {
        self.end_index.saturating_sub(self.start_index)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end_index <= self.start_index
    }
}
