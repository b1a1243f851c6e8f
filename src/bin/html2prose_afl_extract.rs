//! AFL++ fuzz target for `html2prose`.
//!
//! This binary is intentionally stdin-driven, so it can be used with AFL++.
//! Build and run it via `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin html2prose_afl_extract
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/html2prose_afl_extract
//! ```
//!
//! Rust panics normally unwind and exit with a non-crashing status code.
//! AFL++ only treats crashes as signals/aborts. We therefore catch any unwind
//! and turn it into `abort()`.

use std::io::Read;

use html2prose::{extract, render, text::*};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN {
        // guardrail: avoid pathological OOM / quadratic behavior on enormous inputs.
        return;
    }

    // real pages should be UTF-8, but AFL++ will happily hand us arbitrary bytes.
    // lossy conversion keeps the harness total (no early returns that reduce coverage).
    let src = String::from_utf8_lossy(data).to_string();

    let out = extract::extract_document(&src);

    // bounds healing fixes at most one span per offset attribute, and always
    // clamps to the text's byte length.
    let len = out.text.text().len() as u64;
    let corrections: Vec<_> = out
        .diagnostics
        .iter()
        .filter_map(|d| d.correction)
        .collect();
    assert!(corrections.len() <= 2, "more than one clamp per attribute");
    for c in &corrections {
        assert_eq!(c.new_value, len, "clamp must land on the text end");
        assert!(c.old_value > len, "clamp must only fire for offenders");
    }

    // build a full envelope to exercise JSON serialization.
    let text_file = TextFile {
        schema_version: SCHEMA_VERSION,
        extractor: ExtractorInfo {
            name: EXTRACTOR_NAME.to_string(),
            version: EXTRACTOR_VERSION.to_string(),
        },
        offset_encoding: OffsetEncoding::default(),
        document_id: "fuzz".to_string(),
        source: SourceInfo {
            path: None,
            md5: None,
            byte_len: out.byte_len as u64,
        },
        title: out.title,
        diagnostics: out.diagnostics,
        text: out.text,
    };

    // JSON round-trip must never panic.
    let json = serde_json::to_vec(&text_file).unwrap();
    let back: TextFile = serde_json::from_slice(&json).unwrap();

    // rendering should never panic, healed or not.
    let _md = render::render_text(&back.text);
}

fn main() {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data).unwrap();

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}
