use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn prints_existing_md_from_cache() {
    let dir = tempdir().unwrap();

    // cache layout: ./docs/md/{lower_first_letter}/{document_id}.md
    let md_path = dir.path().join("docs").join("md").join("p").join("Perft.md");
    fs::create_dir_all(md_path.parent().unwrap()).unwrap();
    fs::write(&md_path, "cached markdown").unwrap();

    let mut cmd = cargo_bin_cmd!("html2prose");
    cmd.current_dir(dir.path()).arg("Perft");

    // println! adds a trailing newline.
    cmd.assert()
        .success()
        .stdout(predicate::eq("cached markdown\n"));
}

#[test]
fn generates_md_from_existing_html_cache() {
    let dir = tempdir().unwrap();

    // provide a .html cache so the tool does not try to hit the network.
    let html_path = dir
        .path()
        .join("docs")
        .join("html")
        .join("t")
        .join("Test_Page.html");
    fs::create_dir_all(html_path.parent().unwrap()).unwrap();
    fs::write(
        &html_path,
        "<html><head><title>Test Page</title></head>\
         <body><h2>Title</h2><p>See <strong>bold</strong> text.</p></body></html>",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("html2prose");
    cmd.current_dir(dir.path()).arg("Test Page");

    cmd.assert().success().stdout(
        predicate::str::starts_with("---\nhtml2prose:\n")
            .and(predicate::str::contains("document_id: Test_Page"))
            .and(predicate::str::contains("title: \"Test Page\""))
            .and(predicate::str::contains("tags: []"))
            // heading span renders as a Markdown heading
            .and(predicate::str::contains("## Title"))
            .and(predicate::str::contains("See **bold** text.")),
    );

    // it should have written the .md cache.
    let md_path = dir
        .path()
        .join("docs")
        .join("md")
        .join("t")
        .join("Test_Page.md");
    let md = fs::read_to_string(&md_path).unwrap();
    assert!(md.starts_with("---\nhtml2prose:\n"), "{md}");
    assert!(md.contains("## Title"), "{md}");
    assert!(md.contains("See **bold** text."), "{md}");
}

#[test]
fn write_json_flag_writes_the_envelope() {
    let dir = tempdir().unwrap();

    let html_path = dir
        .path()
        .join("docs")
        .join("html")
        .join("s")
        .join("Spans.html");
    fs::create_dir_all(html_path.parent().unwrap()).unwrap();
    fs::write(
        &html_path,
        "<body><p>one <em>two</em></p></body>",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("html2prose");
    cmd.current_dir(dir.path()).arg("--write-json").arg("Spans");
    cmd.assert().success();

    let json_path = dir
        .path()
        .join("docs")
        .join("json")
        .join("s")
        .join("Spans.json");
    let json = fs::read_to_string(&json_path).unwrap();
    assert!(json.contains("\"schema_version\": 1"), "{json}");
    assert!(json.contains("\"document_id\": \"Spans\""), "{json}");
    assert!(json.contains("\"tag\": \"em\""), "{json}");
    // the envelope records an md5 digest of the source html.
    assert!(json.contains("\"md5\""), "{json}");
}

#[test]
fn regenerate_frontmatter_flag_overwrites_existing_frontmatter() {
    let dir = tempdir().unwrap();

    // provide a .html cache.
    let html_path = dir
        .path()
        .join("docs")
        .join("html")
        .join("t")
        .join("Test_Page.html");
    fs::create_dir_all(html_path.parent().unwrap()).unwrap();
    fs::write(&html_path, "<body><p>Body text.</p></body>").unwrap();

    // existing `.md` with foreign frontmatter.
    let md_path = dir
        .path()
        .join("docs")
        .join("md")
        .join("t")
        .join("Test_Page.md");
    fs::create_dir_all(md_path.parent().unwrap()).unwrap();
    fs::write(
        &md_path,
        "---\ncustom: 123\nsummary: \"keep\"\n---\n\nOLD BODY\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("html2prose");
    cmd.current_dir(dir.path())
        .arg("--regenerate-all")
        .arg("--regenerate-frontmatter");

    cmd.assert().success();

    let md = fs::read_to_string(&md_path).unwrap();
    assert!(md.starts_with("---\nhtml2prose:\n"), "{md}");
    assert!(md.contains("summary: \"keep\""), "{md}");
    assert!(md.contains("custom: 123"), "{md}");
    assert!(md.contains("Body text."), "{md}");
    assert!(!md.contains("OLD BODY"), "{md}");
}

#[test]
fn missing_cache_without_url_fails_with_hint() {
    let dir = tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("html2prose");
    cmd.current_dir(dir.path()).arg("Nowhere");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--url"));
}
