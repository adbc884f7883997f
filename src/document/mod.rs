mod docx;
mod reader;

pub use reader::{read_document, DocumentFormat, UploadedDocument};
