use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::docx;

/// A document handed in by the user: raw bytes plus the filename they
/// arrived under. The format is declared by the extension alone; the bytes
/// are never sniffed.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a document from disk for the CLI front end. A missing or
    /// unreadable path is a user error and is reported as one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, bytes })
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_filename(&self.filename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Html,
    PlainText,
}

impl DocumentFormat {
    /// Declared format, keyed on the filename extension only.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "html" | "htm" => Some(Self::Html),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Extract plain text from an uploaded document.
///
/// A missing document, an unrecognized extension, or an unreadable file
/// all yield an empty string rather than an error; the prompt layer treats
/// empty text as "no context". Extraction failures are logged at warn
/// level.
pub fn read_document(file: Option<&UploadedDocument>) -> String {
    let file = match file {
        Some(file) => file,
        None => return String::new(),
    };

    match file.format() {
        Some(DocumentFormat::Pdf) => match pdf_extract::extract_text_from_mem(&file.bytes) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to extract PDF text from {}: {}", file.filename, e);
                String::new()
            }
        },
        Some(DocumentFormat::Docx) => match docx::extract_text(&file.bytes) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to extract DOCX text from {}: {}", file.filename, e);
                String::new()
            }
        },
        Some(DocumentFormat::Html) => {
            let html = String::from_utf8_lossy(&file.bytes);
            let parsed = scraper::Html::parse_document(&html);
            parsed.root_element().text().collect::<String>()
        }
        Some(DocumentFormat::PlainText) => String::from_utf8_lossy(&file.bytes).into_owned(),
        None => {
            log::warn!("Unrecognized document format: {}", file.filename);
            String::new()
        }
    }
}
