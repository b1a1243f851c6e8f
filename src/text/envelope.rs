use crate::text::{Diagnostic, TextWithFormatting};
use serde::{Deserialize, Serialize};

/// Top-level JSON file written to `./docs/json/{bucket}/{document_id}.json`.
///
/// This wraps an extracted [`TextWithFormatting`] with metadata that makes
/// debugging easier (schema versioning, offset encoding, source info,
/// diagnostics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFile {
    /// Schema version for this JSON payload.
    pub schema_version: u32,

    pub extractor: ExtractorInfo,

    /// How to interpret all span offsets contained in this file.
    pub offset_encoding: OffsetEncoding,

    /// Stable identifier used for caching on disk.
    pub document_id: String,

    pub source: SourceInfo,

    /// Document title from `<title>`/first `<h1>`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Extractor/bounds diagnostics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,

    pub text: TextWithFormatting,
}

/// Identifies the program that produced the extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorInfo {
    pub name: String,
    pub version: String,
}

/// Captures how span offsets should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetEncoding {
    pub unit: OffsetUnit,
    pub base: OffsetBase,
}

impl Default for OffsetEncoding {
    fn default() -> Self {
        Self {
            unit: OffsetUnit::Byte,
            base: OffsetBase::ExtractedText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetUnit {
    /// Byte offsets (UTF-8).
    Byte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetBase {
    /// Offsets index into the extracted plain text, not the source HTML.
    ExtractedText,
}

/// Optional information about the input source used for the extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// If available, a path to the `.html` file used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// If available, an MD5 hex digest of the `.html` content used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    /// Length of the source input in bytes.
    pub byte_len: u64,
}
