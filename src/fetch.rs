use reqwest::Url;
use std::error::Error;
use std::fs;

/// Parse and validate a page URL supplied on the command line.
///
/// Only `http`/`https` are accepted; anything else would make the blocking
/// client fail later with a less useful error.
pub fn parse_page_url(raw: &str) -> Result<Url, Box<dyn Error>> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("Unsupported URL scheme `{}` (expected http/https): {}", other, raw).into()),
    }
}

/// Document id derived from the last non-empty path segment of the URL,
/// falling back to the host.
pub fn document_id_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .next_back()
        .map(str::to_string);

    segment
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Fetches the raw HTML for a page and saves it to a file.
pub fn fetch_and_save(url: &Url, filename: &str) -> Result<(), Box<dyn Error>> {
    let resp = reqwest::blocking::get(url.clone())?;

    if !resp.status().is_success() {
        return Err(format!("Request failed: {} (URL: {})", resp.status(), url).into());
    }

    let html_body = resp.text()?;
    fs::write(filename, html_body)?;

    Ok(())
}
