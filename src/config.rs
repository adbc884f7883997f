use std::env;

/// Connection settings for one completion backend, resolved from the
/// environment with per-provider defaults. Temperature defaults to 0.0 so
/// the same question gets the same answer across runs.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub model: String,
    pub api_url: String,
    pub temperature: f32,
}

impl BackendConfig {
    pub fn from_env(provider: &str) -> Self {
        let prefix = provider.to_uppercase();

        // Get model from env or use default
        let model = env::var(format!("{}_MODEL", prefix))
            .unwrap_or_else(|_| match provider {
                "ollama" => "llama3.2:latest".to_string(),
                "gemini" => "gemini-2.5-flash".to_string(),
                _ => String::new(),
            });

        // Get API URL from env or use default. OLLAMA_HOST is honored as a
        // fallback because that is what the Ollama tooling itself exports.
        let api_url = env::var(format!("{}_API_URL", prefix))
            .unwrap_or_else(|_| match provider {
                "ollama" => env::var("OLLAMA_HOST")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                "gemini" => "https://generativelanguage.googleapis.com/v1beta".to_string(),
                _ => String::new(),
            });

        // Get temperature from env or use default
        let temperature = env::var(format!("{}_TEMPERATURE", prefix))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.0);

        Self {
            model,
            api_url,
            temperature,
        }
    }
}
