use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::BackendConfig;
use crate::providers::traits::{CompletionProvider, ProviderError};

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Locally hosted Ollama backend. Constructing it probes the server once;
/// an unreachable server means no local backend for the whole session.
#[derive(Clone)]
pub struct OllamaProvider {
    client: Client,
    config: BackendConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaProvider {
    pub async fn new() -> Result<Self, ProviderError> {
        let config = BackendConfig::from_env("ollama");
        let client = Client::new();

        // One-time availability probe. Generation requests themselves get
        // no timeout, matching the remote backend.
        let response = client
            .get(format!("{}/api/version", config.api_url))
            .timeout(VERSION_PROBE_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Api {
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.config.api_url))
            .json(&json!({
                "model": self.config.model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": self.config.temperature
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        Ok(body.response)
    }

    fn model_info(&self) -> String {
        self.config.model.clone()
    }

    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
        Box::new(self.clone())
    }
}
