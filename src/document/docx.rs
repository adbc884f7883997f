//! DOCX body-text extraction.
//!
//! A `.docx` file is a zip archive; the document body lives in
//! `word/document.xml`. Only `<w:t>` runs carry visible text, so the
//! extractor walks the markup and collects those, turning paragraph ends,
//! breaks, and tabs into `\n` / `\t`.

use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a readable docx archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to read document body: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract all paragraph text from DOCX bytes, in document order.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    Ok(collect_text_runs(&xml))
}

fn collect_text_runs(xml: &str) -> String {
    let mut out = String::new();
    let mut rest = xml;
    let mut in_text_run = false;

    while let Some(open) = rest.find('<') {
        if in_text_run && open > 0 {
            push_decoded(&mut out, &rest[..open]);
        }
        let close = match rest[open..].find('>') {
            Some(i) => open + i,
            None => break,
        };
        let tag = &rest[open + 1..close];
        let name = tag
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");

        in_text_run = name == "w:t" && !tag.ends_with('/');
        match name {
            "w:tab" => out.push('\t'),
            "w:br" => out.push('\n'),
            _ if tag == "/w:p" => out.push('\n'),
            _ => {}
        }
        rest = &rest[close + 1..];
    }

    out
}

// The five predefined XML entities; numeric references are rare enough in
// word processor output that they are left as-is.
fn push_decoded(out: &mut String, raw: &str) {
    if raw.contains('&') {
        out.push_str(
            &raw.replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&apos;", "'")
                .replace("&amp;", "&"),
        );
    } else {
        out.push_str(raw);
    }
}
