pub mod commands;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod prompt;
pub mod providers;

// Re-export commonly used items
pub use dispatch::{DispatchOutcome, Dispatcher, ProviderChoice};
pub use document::{read_document, UploadedDocument};
