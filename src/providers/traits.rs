use async_trait::async_trait;
use thiserror::Error;

/// Errors a backend call can produce. The fallback policy treats them all
/// the same way; tests need to tell a dead socket from a garbled body.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: status {status}, body: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A text-completion backend. Both the local Ollama model and the hosted
/// Gemini model implement this; the dispatcher only ever sees the trait.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one prompt, receive the full completion. No streaming.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Model identifier this provider is pinned to.
    fn model_info(&self) -> String;

    /// Short display name for status lines and warnings.
    fn name(&self) -> &'static str;

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync>;
}

impl Clone for Box<dyn CompletionProvider + Send + Sync> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
