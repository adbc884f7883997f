//! Routing between the local and remote completion backends.
//!
//! Policy: a local selection falls back to the remote backend on any local
//! failure (one hop, no retries); a remote selection never falls back and
//! its errors propagate to the caller.

use anyhow::Result;

use crate::providers::traits::{CompletionProvider, ProviderError};

pub const FALLBACK_WARNING: &str = "Ollama not available, using Gemini instead";

/// Which backend the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    Local,
    Remote,
}

impl ProviderChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "ollama" | "local" => Some(Self::Local),
            "gemini" | "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// What one dispatched action produced. The warning is set when the local
/// backend was selected but the remote one ended up answering.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub answer: String,
    pub warning: Option<String>,
    pub served_by: &'static str,
}

/// Holds the session's backends. The local slot is `None` when the local
/// backend failed to initialize at startup; that is decided once, not per
/// request.
pub struct Dispatcher {
    local: Option<Box<dyn CompletionProvider + Send + Sync>>,
    remote: Box<dyn CompletionProvider + Send + Sync>,
}

impl Dispatcher {
    pub fn new(
        local: Option<Box<dyn CompletionProvider + Send + Sync>>,
        remote: Box<dyn CompletionProvider + Send + Sync>,
    ) -> Self {
        Self { local, remote }
    }

    pub fn local_available(&self) -> bool {
        self.local.is_some()
    }

    pub fn local_model(&self) -> Option<String> {
        self.local.as_ref().map(|provider| provider.model_info())
    }

    pub fn remote_model(&self) -> String {
        self.remote.model_info()
    }

    /// Route one prompt according to the user's backend choice.
    pub async fn dispatch(&self, choice: ProviderChoice, prompt: &str) -> Result<DispatchOutcome> {
        match choice {
            ProviderChoice::Local => match &self.local {
                Some(local) => match local.complete(prompt).await {
                    Ok(answer) => Ok(DispatchOutcome {
                        answer,
                        warning: None,
                        served_by: local.name(),
                    }),
                    Err(e) => {
                        log::warn!(
                            "{} call failed ({}), falling back to {}: {}",
                            local.name(),
                            classify(&e),
                            self.remote.name(),
                            e
                        );
                        self.answer_remotely_with_warning(prompt).await
                    }
                },
                None => self.answer_remotely_with_warning(prompt).await,
            },
            ProviderChoice::Remote => {
                let answer = self.remote.complete(prompt).await?;
                Ok(DispatchOutcome {
                    answer,
                    warning: None,
                    served_by: self.remote.name(),
                })
            }
        }
    }

    async fn answer_remotely_with_warning(&self, prompt: &str) -> Result<DispatchOutcome> {
        let answer = self.remote.complete(prompt).await?;
        Ok(DispatchOutcome {
            answer,
            warning: Some(FALLBACK_WARNING.to_string()),
            served_by: self.remote.name(),
        })
    }
}

fn classify(error: &ProviderError) -> &'static str {
    match error {
        ProviderError::Transport(_) => "transport",
        ProviderError::Api { .. } => "api",
        ProviderError::MalformedResponse(_) => "malformed response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone)]
    struct StaticProvider {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl CompletionProvider for StaticProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok(self.reply.to_string())
        }

        fn model_info(&self) -> String {
            "static-test".to_string()
        }

        fn name(&self) -> &'static str {
            self.name
        }

        fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
            Box::new(self.clone())
        }
    }

    // Echoes the prompt back, so tests can assert it arrived verbatim.
    #[derive(Clone)]
    struct EchoProvider;

    #[async_trait]
    impl CompletionProvider for EchoProvider {
        async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            Ok(prompt.to_string())
        }

        fn model_info(&self) -> String {
            "echo-test".to_string()
        }

        fn name(&self) -> &'static str {
            "Gemini"
        }

        fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
            Box::new(self.clone())
        }
    }

    #[derive(Clone)]
    struct FailingProvider {
        name: &'static str,
    }

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::MalformedResponse(
                "no candidates in body".to_string(),
            ))
        }

        fn model_info(&self) -> String {
            "failing-test".to_string()
        }

        fn name(&self) -> &'static str {
            self.name
        }

        fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
            Box::new(self.clone())
        }
    }

    fn local_ok() -> Option<Box<dyn CompletionProvider + Send + Sync>> {
        Some(Box::new(StaticProvider {
            name: "Ollama",
            reply: "local answer",
        }))
    }

    fn remote_ok() -> Box<dyn CompletionProvider + Send + Sync> {
        Box::new(StaticProvider {
            name: "Gemini",
            reply: "remote answer",
        })
    }

    #[tokio::test]
    async fn healthy_local_answers_without_warning() {
        let dispatcher = Dispatcher::new(local_ok(), remote_ok());
        let outcome = dispatcher
            .dispatch(ProviderChoice::Local, "question")
            .await
            .unwrap();
        assert_eq!(outcome.answer, "local answer");
        assert_eq!(outcome.served_by, "Ollama");
        assert!(outcome.warning.is_none());
    }

    #[tokio::test]
    async fn unavailable_local_routes_to_remote_with_one_warning_per_action() {
        let dispatcher = Dispatcher::new(None, remote_ok());
        for _ in 0..2 {
            let outcome = dispatcher
                .dispatch(ProviderChoice::Local, "question")
                .await
                .unwrap();
            assert_eq!(outcome.answer, "remote answer");
            assert_eq!(outcome.served_by, "Gemini");
            assert_eq!(outcome.warning.as_deref(), Some(FALLBACK_WARNING));
        }
    }

    #[tokio::test]
    async fn failing_local_falls_back_to_remote_result() {
        let local: Box<dyn CompletionProvider + Send + Sync> =
            Box::new(FailingProvider { name: "Ollama" });
        let remote = remote_ok();
        let expected = remote.complete("question").await.unwrap();

        let dispatcher = Dispatcher::new(Some(local), remote);
        let outcome = dispatcher
            .dispatch(ProviderChoice::Local, "question")
            .await
            .unwrap();
        assert_eq!(outcome.answer, expected);
        assert_eq!(outcome.warning.as_deref(), Some(FALLBACK_WARNING));
    }

    #[tokio::test]
    async fn remote_selection_receives_the_exact_prompt() {
        let dispatcher = Dispatcher::new(None, Box::new(EchoProvider));
        let outcome = dispatcher
            .dispatch(ProviderChoice::Remote, "What is 2+2?")
            .await
            .unwrap();
        assert_eq!(outcome.answer, "What is 2+2?");
        assert!(outcome.warning.is_none());
    }

    #[tokio::test]
    async fn remote_selection_never_falls_back() {
        let dispatcher = Dispatcher::new(local_ok(), Box::new(FailingProvider { name: "Gemini" }));
        let result = dispatcher.dispatch(ProviderChoice::Remote, "question").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn remote_failure_during_fallback_propagates() {
        let dispatcher = Dispatcher::new(None, Box::new(FailingProvider { name: "Gemini" }));
        let result = dispatcher.dispatch(ProviderChoice::Local, "question").await;
        assert!(result.is_err());
    }

    #[test]
    fn provider_errors_are_distinguishable_by_variant() {
        let api = ProviderError::Api {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "overloaded".to_string(),
        };
        let malformed = ProviderError::MalformedResponse("truncated body".to_string());
        assert_eq!(classify(&api), "api");
        assert_eq!(classify(&malformed), "malformed response");
        assert!(matches!(api, ProviderError::Api { .. }));
        assert!(matches!(malformed, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn provider_choice_parses_both_spellings() {
        assert_eq!(ProviderChoice::parse("ollama"), Some(ProviderChoice::Local));
        assert_eq!(ProviderChoice::parse("LOCAL"), Some(ProviderChoice::Local));
        assert_eq!(ProviderChoice::parse("Gemini"), Some(ProviderChoice::Remote));
        assert_eq!(ProviderChoice::parse("remote"), Some(ProviderChoice::Remote));
        assert_eq!(ProviderChoice::parse("claude"), None);
    }
}
