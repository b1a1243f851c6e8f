pub mod extract;
pub mod fetch;
pub mod meta;
pub mod render;
pub mod text;

use deunicode::deunicode;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Options controlling how Markdown files are written on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// If true, regenerate YAML frontmatter even when the destination `.md`
    /// already contains a frontmatter block.
    pub regenerate_frontmatter: bool,
}

/// Single file mode: extract a cached `.html` document and convert.
pub fn run(raw_id: &str, write_json: bool) -> Result<(), Box<dyn Error>> {
    run_with_options(
        raw_id,
        write_json,
        &render::RenderOptions::default(),
        &WriteOptions::default(),
    )
}

/// Single file mode: like [`run`], but allows callers to customize Markdown
/// rendering and how files are written (frontmatter preservation, etc.).
pub fn run_with_options(
    raw_id: &str,
    write_json: bool,
    render_opts: &render::RenderOptions,
    write_opts: &WriteOptions,
) -> Result<(), Box<dyn Error>> {
    let document_id = sanitize_document_id(raw_id);
    let paths = CachePaths::for_document(&document_id, write_json)?;

    // does ./docs/md/{bucket}/{document_id}.md exist?
    if paths.md.exists() {
        let content = fs::read_to_string(&paths.md)?;
        println!("{}", content);
        return Ok(());
    }

    if !paths.html.exists() {
        return Err(format!(
            "No cached HTML for `{}` ({}). Fetch it first with --url.",
            document_id,
            paths.html.display()
        )
        .into());
    }

    convert_cached_html(&document_id, &paths, write_json, render_opts, write_opts)
}

/// URL mode: fetch the page into the HTML cache if needed, then convert.
pub fn run_url(
    raw_url: &str,
    write_json: bool,
    render_opts: &render::RenderOptions,
    write_opts: &WriteOptions,
) -> Result<(), Box<dyn Error>> {
    let url = fetch::parse_page_url(raw_url)?;
    let document_id = sanitize_document_id(&fetch::document_id_from_url(&url));
    let paths = CachePaths::for_document(&document_id, write_json)?;

    if paths.md.exists() {
        let content = fs::read_to_string(&paths.md)?;
        println!("{}", content);
        return Ok(());
    }

    if !paths.html.exists() {
        fetch::fetch_and_save(&url, paths.html.to_string_lossy().as_ref())?;
    }

    convert_cached_html(&document_id, &paths, write_json, render_opts, write_opts)
}

fn convert_cached_html(
    document_id: &str,
    paths: &CachePaths,
    write_json: bool,
    render_opts: &render::RenderOptions,
    write_opts: &WriteOptions,
) -> Result<(), Box<dyn Error>> {
    let out = extract_file(&paths.html)?;

    match write_json {
        true => {
            // write .json
            write_json_envelope(document_id, &paths.html, &out, &paths.json)?;

            // write .md from the envelope on disk, so the JSON path stays
            // exercised end to end.
            let md_content = render_markdown_from_json(
                document_id,
                &paths.html,
                &paths.json,
                &paths.md,
                render_opts,
                write_opts,
            )?;
            println!("{}", md_content);
        }
        false => {
            let md_body = render::render_text_with_options(&out.text, render_opts);
            let md_content = write_markdown_file(
                &paths.md,
                &paths.html,
                document_id,
                out.title.as_deref(),
                &md_body,
                write_opts,
            )?;
            println!("{}", md_content);
        }
    }

    Ok(())
}

/// Bulk mode: Walk ./docs/html and regenerate all corresponding .md files.
pub fn regenerate_all() -> Result<(), Box<dyn Error>> {
    regenerate_all_with_options(&render::RenderOptions::default(), &WriteOptions::default())
}

/// Bulk mode: like [`regenerate_all`], but allows callers to customize
/// rendering and writing.
pub fn regenerate_all_with_options(
    render_opts: &render::RenderOptions,
    write_opts: &WriteOptions,
) -> Result<(), Box<dyn Error>> {
    let html_root = PathBuf::from("docs").join("html");
    let md_root = PathBuf::from("docs").join("md");
    regenerate_all_in_dirs(&html_root, &md_root, render_opts, write_opts)
}

/// Bulk mode: Walk the provided HTML root directory and regenerate all
/// corresponding Markdown files under the provided md root directory.
pub fn regenerate_all_in_dirs(
    html_root: &Path,
    md_root: &Path,
    render_opts: &render::RenderOptions,
    write_opts: &WriteOptions,
) -> Result<(), Box<dyn Error>> {
    let start_time = Instant::now();

    if !html_root.exists() {
        return Err(format!("HTML source directory not found: {}", html_root.display()).into());
    }

    let mut entries: Vec<_> = WalkDir::new(html_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "html")
        })
        .collect();

    entries.sort_by(|a, b| a.path().cmp(b.path()));

    let total = entries.len();
    let mut count = 0;

    for entry in entries {
        let path = entry.path();
        // keep the same relative structure in the md/ directory.
        let relative = path.strip_prefix(html_root)?;

        let mut md_path = md_root.join(relative);
        md_path.set_extension("md");

        if let Some(parent) = md_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let document_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string();

        let out = extract_file(path)?;
        let md_body = render::render_text_with_options(&out.text, render_opts);
        let _full_md = write_markdown_file(
            &md_path,
            path,
            &document_id,
            out.title.as_deref(),
            &md_body,
            write_opts,
        )?;

        count += 1;

        let elapsed = start_time.elapsed();
        let total_ms = elapsed.as_millis();
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        eprintln!(
            "[{:>4}/{:>4}] [{:02}:{:02}.{:03}] Regenerated: {:?}",
            count, total, mins, secs, ms, md_path
        );
    }

    let total_elapsed = start_time.elapsed();
    let total_secs = total_elapsed.as_secs_f64();
    let avg_str = if count > 0 {
        format!("{:.3}s", total_secs / count as f64)
    } else {
        "-".to_string()
    };

    eprintln!(
        "Done. Regenerated {} files in {:.3}s (avg {}/doc).",
        count, total_secs, avg_str
    );
    Ok(())
}

/// Cache layout: `docs/{html,json,md}/{bucket}/{document_id}.{ext}` with the
/// bucket being the lowered first letter of the document id.
struct CachePaths {
    html: PathBuf,
    json: PathBuf,
    md: PathBuf,
}

impl CachePaths {
    fn for_document(document_id: &str, write_json: bool) -> Result<Self, Box<dyn Error>> {
        let bucket = lower_first_letter_bucket(document_id);

        let html_dir = PathBuf::from("docs").join("html").join(&bucket);
        let json_dir = PathBuf::from("docs").join("json").join(&bucket);
        let md_dir = PathBuf::from("docs").join("md").join(&bucket);

        // ensure directories exist
        fs::create_dir_all(&html_dir)?;
        fs::create_dir_all(&md_dir)?;

        if write_json {
            fs::create_dir_all(&json_dir)?;
        }

        Ok(Self {
            html: html_dir.join(format!("{}.html", document_id)),
            json: json_dir.join(format!("{}.json", document_id)),
            md: md_dir.join(format!("{}.md", document_id)),
        })
    }
}

fn extract_file(html_path: &Path) -> Result<extract::ExtractOutput, Box<dyn Error>> {
    let bytes = fs::read(html_path)?;

    // if we ever encounter invalid UTF-8, fallback to lossy conversion
    let html_content = String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).to_string());

    Ok(extract::extract_document(&html_content))
}

fn write_json_envelope(
    document_id: &str,
    html_path: &Path,
    out: &extract::ExtractOutput,
    json_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let source_bytes = fs::read(html_path)?;
    let digest = format!("{:x}", md5::compute(&source_bytes));

    let text_file = text::TextFile {
        schema_version: text::SCHEMA_VERSION,
        extractor: text::ExtractorInfo {
            name: text::EXTRACTOR_NAME.to_string(),
            version: text::EXTRACTOR_VERSION.to_string(),
        },
        offset_encoding: text::OffsetEncoding::default(),
        document_id: document_id.to_string(),
        source: text::SourceInfo {
            path: Some(html_path.to_string_lossy().to_string()),
            md5: Some(digest),
            byte_len: out.byte_len as u64,
        },
        title: out.title.clone(),
        diagnostics: out.diagnostics.clone(),
        text: out.text.clone(),
    };

    // prettify JSON so it's easy to inspect / diff.
    let json = serde_json::to_string_pretty(&text_file)?;
    fs::write(json_path, json)?;
    Ok(())
}

fn render_markdown_from_json(
    document_id: &str,
    html_path: &Path,
    json_path: &Path,
    md_path: &Path,
    render_opts: &render::RenderOptions,
    write_opts: &WriteOptions,
) -> Result<String, Box<dyn Error>> {
    let json_text = fs::read_to_string(json_path)?;
    let text_file: text::TextFile = serde_json::from_str(&json_text)?;
    let md_body = render::render_text_with_options(&text_file.text, render_opts);
    let full = write_markdown_file(
        md_path,
        html_path,
        document_id,
        text_file.title.as_deref(),
        &md_body,
        write_opts,
    )?;
    Ok(full)
}

fn write_markdown_file(
    md_path: &Path,
    html_path: &Path,
    document_id: &str,
    title: Option<&str>,
    md_body: &str,
    write_opts: &WriteOptions,
) -> Result<String, Box<dyn Error>> {
    let existing = if md_path.exists() {
        Some(fs::read_to_string(md_path)?)
    } else {
        None
    };

    let mut frontmatter_text: Option<String> = None;

    if let Some(existing_text) = existing.as_deref()
        && let Some((fm, _)) = meta::split_yaml_frontmatter(existing_text)
        && !write_opts.regenerate_frontmatter
    {
        frontmatter_text = Some(fm);
    }

    if frontmatter_text.is_none() {
        let mut fm = meta::build_frontmatter(document_id, html_path, title)?;

        // when explicitly regenerating frontmatter, preserve user-authored
        // summary and any unknown top-level YAML keys.
        if write_opts.regenerate_frontmatter
            && let Some(existing_text) = existing.as_deref()
        {
            meta::merge_existing_frontmatter_for_regeneration(&mut fm, existing_text);
        }

        frontmatter_text = Some(fm.to_yaml_string());
    }

    let mut out = String::new();
    if let Some(fm) = frontmatter_text {
        out.push_str(&fm);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        // blank line after frontmatter for readability.
        out.push('\n');
    }

    // avoid leading blank lines in the body to keep output stable.
    let body = md_body.trim_start_matches(['\n', '\r']);
    out.push_str(body);

    fs::write(md_path, &out)?;
    Ok(out)
}

pub(crate) fn sanitize_document_id(raw_id: &str) -> String {
    // transliterate so cache filenames stay plain ASCII.
    let mut id = deunicode(raw_id.trim()).replace(' ', "_");
    id = id.replace(['/', '\\'], "_");
    if id.is_empty() {
        id = "Untitled".to_string();
    }
    id
}

pub(crate) fn lower_first_letter_bucket(document_id: &str) -> String {
    let first = document_id.chars().next().unwrap_or('x');
    first.to_lowercase().collect()
}
