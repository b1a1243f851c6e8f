//! YAML frontmatter handling for generated Markdown.
//!
//! Goals:
//! - Preserve existing YAML frontmatter verbatim by default.
//! - Generate frontmatter when missing.
//! - Optionally regenerate frontmatter, best-effort merge of preserved fields.

use serde_yaml::Value;
use std::path::Path;
use std::{fs, io};
use time::{OffsetDateTime, macros::format_description};

/// Top-level frontmatter we generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub html2prose: ToolMeta,

    /// Document title from `<title>`/first `<h1>`, if the extractor found one.
    pub title: Option<String>,

    pub tags: Vec<String>,

    /// Reserved for user-authored content. If empty/None, it is omitted from
    /// generated YAML.
    pub summary: Option<String>,

    /// Extra unrecognized YAML keys preserved during regeneration.
    pub extras_yaml: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMeta {
    pub document_id: String,

    /// Path or URL of the HTML source this Markdown was generated from.
    pub source: String,

    pub generated_by: String,
    pub extracted_date: String,
    pub schema_version: u32,
}

impl Frontmatter {
    pub fn to_yaml_string(&self) -> String {
        let mut out = String::new();
        out.push_str("---\n");
        out.push_str("html2prose:\n");
        out.push_str(&format!("  document_id: {}\n", self.html2prose.document_id));
        out.push_str(&format!("  source: {}\n", yaml_quote(&self.html2prose.source)));
        out.push_str(&format!("  generated_by: {}\n", self.html2prose.generated_by));
        out.push_str(&format!(
            "  extracted_date: {}\n",
            self.html2prose.extracted_date
        ));
        out.push_str(&format!(
            "  schema_version: {}\n",
            self.html2prose.schema_version
        ));

        if let Some(title) = self.title.as_ref().filter(|t| !t.trim().is_empty()) {
            out.push_str(&format!("title: {}\n", yaml_quote(title)));
        }

        if let Some(summary) = self.summary.as_ref().filter(|s| !s.trim().is_empty()) {
            out.push_str(&format!("summary: {}\n", yaml_quote(summary)));
        }

        if self.tags.is_empty() {
            out.push_str("tags: []\n");
        } else {
            out.push_str("tags:\n");
            for t in &self.tags {
                out.push_str(&format!("  - {}\n", t));
            }
        }

        if let Some(extra) = self.extras_yaml.as_ref().filter(|s| !s.trim().is_empty()) {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(extra);
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }

        out.push_str("---\n");
        out
    }
}

fn yaml_quote(s: &str) -> String {
    // escape backslashes and double quotes.
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// If `text` starts with YAML frontmatter (`---` ... `---`), return the frontmatter
/// block verbatim (including both `---` lines and their original newlines) and
/// the remainder of the document.
pub fn split_yaml_frontmatter(text: &str) -> Option<(String, &str)> {
    // accept both \n and \r\n. "---" must be exactly on the first line.
    if !(text.starts_with("---\n") || text.starts_with("---\r\n")) {
        return None;
    }

    let mut pos = 0usize;
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    pos += first.len();

    for line in lines {
        pos += line.len();
        // `line` includes trailing `\n`.
        if line.trim_end_matches(['\n', '\r']) == "---" {
            let fm = text[..pos].to_string();
            let rest = &text[pos..];
            return Some((fm, rest));
        }
    }
    None
}

/// Build frontmatter for an extracted document.
pub fn build_frontmatter(
    document_id: &str,
    html_path: &Path,
    title: Option<&str>,
) -> io::Result<Frontmatter> {
    let extracted_date = html_file_mod_date(html_path)?;

    Ok(Frontmatter {
        html2prose: ToolMeta {
            document_id: document_id.to_string(),
            source: html_path.to_string_lossy().to_string(),
            generated_by: "html2prose".to_string(),
            extracted_date,
            schema_version: 1,
        },
        title: title.map(str::to_string),
        tags: vec![],
        summary: None,
        extras_yaml: None,
    })
}

/// When frontmatter regeneration is requested, we still want to preserve
/// user-authored fields where possible (e.g., a hand-written summary) and any
/// extra top-level keys.
pub fn merge_existing_frontmatter_for_regeneration(
    generated: &mut Frontmatter,
    existing_text: &str,
) {
    let Some((yaml_block, _rest)) = split_yaml_frontmatter(existing_text) else {
        return;
    };

    let Some(inner) = extract_yaml_inner(&yaml_block) else {
        return;
    };

    let Ok(Value::Mapping(mut map)) = serde_yaml::from_str::<Value>(&inner) else {
        return;
    };

    // preserve `summary` if present and non-empty.
    if let Some(Value::String(s)) = map.get(Value::String("summary".to_string()))
        && !s.trim().is_empty()
    {
        generated.summary = Some(s.clone());
    }

    // remove keys we manage.
    for k in ["html2prose", "title", "tags", "summary"] {
        map.remove(Value::String(k.to_string()));
    }

    if map.is_empty() {
        generated.extras_yaml = None;
        return;
    }

    // serialize the remaining keys.
    let serialized = serde_yaml::to_string(&Value::Mapping(map)).unwrap_or_default();
    let extras = strip_yaml_document_markers(&serialized);
    if !extras.trim().is_empty() {
        generated.extras_yaml = Some(extras);
    }
}

fn extract_yaml_inner(frontmatter_block: &str) -> Option<String> {
    let mut lines = frontmatter_block.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }

    let mut out = String::new();
    for line in lines {
        if line.trim_end() == "---" {
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    Some(out)
}

fn strip_yaml_document_markers(s: &str) -> String {
    // serde_yaml typically omits these markers; checked anyway.
    let mut out = s.to_string();
    if out.starts_with("---\n") {
        out = out.trim_start_matches("---\n").to_string();
    }
    if out.ends_with("...\n") {
        out = out.trim_end_matches("...\n").to_string();
    }
    out
}

fn html_file_mod_date(html_path: &Path) -> io::Result<String> {
    let meta = fs::metadata(html_path)?;
    let mtime = meta.modified()?;
    let dt = OffsetDateTime::from(mtime);
    let fmt = format_description!("[year]-[month]-[day]");
    Ok(dt.format(&fmt).unwrap_or_else(|_| "1970-01-01".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frontmatter {
        Frontmatter {
            html2prose: ToolMeta {
                document_id: "Test_Page".to_string(),
                source: "docs/html/t/Test_Page.html".to_string(),
                generated_by: "html2prose".to_string(),
                extracted_date: "2026-01-02".to_string(),
                schema_version: 1,
            },
            title: Some("Test Page".to_string()),
            tags: vec![],
            summary: None,
            extras_yaml: None,
        }
    }

    #[test]
    fn yaml_output_shape() {
        let yaml = sample().to_yaml_string();
        assert!(yaml.starts_with("---\nhtml2prose:\n"), "{yaml}");
        assert!(yaml.contains("  document_id: Test_Page\n"), "{yaml}");
        assert!(yaml.contains("title: \"Test Page\"\n"), "{yaml}");
        assert!(yaml.contains("tags: []\n"), "{yaml}");
        assert!(yaml.ends_with("---\n"), "{yaml}");
    }

    #[test]
    fn split_returns_block_and_rest() {
        let text = "---\na: 1\n---\n\nbody\n";
        let (fm, rest) = split_yaml_frontmatter(text).unwrap();
        assert_eq!(fm, "---\na: 1\n---\n");
        assert_eq!(rest, "\nbody\n");

        assert!(split_yaml_frontmatter("no frontmatter").is_none());
        assert!(split_yaml_frontmatter("--- not on its own line\n").is_none());
    }

    #[test]
    fn merge_preserves_summary_and_unknown_keys() {
        let mut fm = sample();
        let existing = "---\nsummary: \"keep me\"\ncustom_key: 42\ntags:\n  - drop\n---\n\nOLD\n";
        merge_existing_frontmatter_for_regeneration(&mut fm, existing);

        assert_eq!(fm.summary.as_deref(), Some("keep me"));
        let extras = fm.extras_yaml.as_deref().expect("extras kept");
        assert!(extras.contains("custom_key: 42"), "{extras}");
        assert!(!extras.contains("tags"), "{extras}");

        let yaml = fm.to_yaml_string();
        assert!(yaml.contains("summary: \"keep me\"\n"), "{yaml}");
        assert!(yaml.contains("custom_key: 42"), "{yaml}");
    }
}
