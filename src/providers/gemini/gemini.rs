use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::BackendConfig;
use crate::providers::traits::{CompletionProvider, ProviderError};

/// Hosted Gemini backend, reached over HTTPS with an API key. This is the
/// remote side of the dispatcher: its failures are never caught here.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    config: BackendConfig,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
            config: BackendConfig::from_env("gemini"),
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_url, self.config.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": [{
                        "text": prompt
                    }]
                }],
                "generationConfig": {
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

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ProviderError::MalformedResponse(response_json.to_string()))
    }

    fn model_info(&self) -> String {
        self.config.model.clone()
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
        Box::new(self.clone())
    }
}
