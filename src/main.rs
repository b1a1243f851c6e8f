use clap::Parser;
use html2prose::{WriteOptions, render::RenderOptions};
use std::error::Error;

/// Extract readable text + formatting spans from HTML pages and cache the
/// results as JSON envelopes and Markdown under ./docs/.
#[derive(Debug, Parser)]
#[command(name = "html2prose", version)]
struct Cli {
    /// Document id of a page cached under docs/html/{bucket}/.
    id: Option<String>,

    /// Fetch this URL into the HTML cache first, then convert it.
    #[arg(long, conflicts_with = "id")]
    url: Option<String>,

    /// Also write the JSON envelope to docs/json/{bucket}/.
    #[arg(long)]
    write_json: bool,

    /// Walk docs/html and regenerate every Markdown file.
    #[arg(long)]
    regenerate_all: bool,

    /// Regenerate YAML frontmatter even when the destination .md already
    /// has one (user-authored summary and unknown keys are preserved).
    #[arg(long)]
    regenerate_frontmatter: bool,

    /// Render links as plain labels, without their targets.
    #[arg(long)]
    no_link_targets: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let render_opts = RenderOptions {
        include_link_targets: !cli.no_link_targets,
    };
    let write_opts = WriteOptions {
        regenerate_frontmatter: cli.regenerate_frontmatter,
    };

    if cli.regenerate_all {
        return html2prose::regenerate_all_with_options(&render_opts, &write_opts);
    }

    if let Some(url) = cli.url.as_deref() {
        return html2prose::run_url(url, cli.write_json, &render_opts, &write_opts);
    }

    match cli.id.as_deref() {
        Some(id) => html2prose::run_with_options(id, cli.write_json, &render_opts, &write_opts),
        None => Err("Nothing to do: pass a document id, --url, or --regenerate-all.".into()),
    }
}
