use serde::{Deserialize, Serialize};
use sift_llm::ChatClient;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Upstream model provider, selected by model-name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Google,
}

impl Provider {
    /// Prefix rule: `gpt*` routes to OpenAI, `gemini*` to Google, anything
    /// else is unroutable.
    pub fn for_model(model: &str) -> Option<Provider> {
        if model.starts_with("gpt") {
            Some(Provider::OpenAI)
        } else if model.starts_with("gemini") {
            Some(Provider::Google)
        } else {
            None
        }
    }

    /// Stable machine-readable identifier, matching the serde rename
    pub fn key(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::Google => write!(f, "Gemini"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid model specified: {0}")]
    UnknownModel(String),

    #[error("{0} API key not configured")]
    MissingCredential(Provider),
}

/// Holds one client per provider whose credential was configured at boot.
///
/// Resolution happens before any network call: an unroutable model name or
/// an unconfigured provider fails here, so nothing ever leaks upstream on a
/// request that cannot complete.
#[derive(Default)]
pub struct ProviderRegistry {
    openai: Option<Arc<dyn ChatClient>>,
    google: Option<Arc<dyn ChatClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openai(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.openai = Some(client);
        self
    }

    pub fn with_google(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.google = Some(client);
        self
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        match provider {
            Provider::OpenAI => self.openai.is_some(),
            Provider::Google => self.google.is_some(),
        }
    }

    /// Providers with a configured credential, in a stable order
    pub fn configured(&self) -> Vec<Provider> {
        [Provider::OpenAI, Provider::Google]
            .into_iter()
            .filter(|p| self.is_configured(*p))
            .collect()
    }

    /// Map a model name to its client, failing closed when the model is
    /// unroutable or the matching credential is absent.
    pub fn resolve(&self, model: &str) -> Result<Arc<dyn ChatClient>, DispatchError> {
        let provider = Provider::for_model(model)
            .ok_or_else(|| DispatchError::UnknownModel(model.to_string()))?;

        let client = match provider {
            Provider::OpenAI => self.openai.as_ref(),
            Provider::Google => self.google.as_ref(),
        };

        client
            .cloned()
            .ok_or(DispatchError::MissingCredential(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use sift_llm::traits::EventStream;
    use sift_llm::{ChatRequest, ChatResponse};

    struct NullClient;

    #[async_trait]
    impl ChatClient for NullClient {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
            unimplemented!("never dispatched in these tests")
        }

        async fn chat_stream(&self, _request: ChatRequest) -> Result<EventStream> {
            unimplemented!("never dispatched in these tests")
        }
    }

    #[test]
    fn test_prefix_routing() {
        assert_eq!(Provider::for_model("gpt-4-turbo"), Some(Provider::OpenAI));
        assert_eq!(Provider::for_model("gpt-4o-mini"), Some(Provider::OpenAI));
        assert_eq!(
            Provider::for_model("gemini-2.0-flash"),
            Some(Provider::Google)
        );

        assert_eq!(Provider::for_model("claude-3"), None);
        assert_eq!(Provider::for_model(""), None);
    }

    #[test]
    fn test_unknown_model_fails_closed() {
        let registry = ProviderRegistry::new().with_openai(Arc::new(NullClient));

        match registry.resolve("llama-3") {
            Err(DispatchError::UnknownModel(model)) => assert_eq!(model, "llama-3"),
            other => panic!("Expected UnknownModel, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_credential_fails_before_dispatch() {
        let registry = ProviderRegistry::new().with_google(Arc::new(NullClient));

        match registry.resolve("gpt-4-turbo") {
            Err(DispatchError::MissingCredential(provider)) => {
                assert_eq!(provider, Provider::OpenAI);
                assert_eq!(
                    DispatchError::MissingCredential(provider).to_string(),
                    "OpenAI API key not configured"
                );
            }
            other => panic!("Expected MissingCredential, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_resolve_configured_provider() {
        let registry = ProviderRegistry::new().with_google(Arc::new(NullClient));
        assert!(registry.resolve("gemini-2.0-flash").is_ok());
    }

    #[test]
    fn test_configured_listing() {
        let registry = ProviderRegistry::new().with_google(Arc::new(NullClient));
        assert_eq!(registry.configured(), vec![Provider::Google]);

        let both = ProviderRegistry::new()
            .with_openai(Arc::new(NullClient))
            .with_google(Arc::new(NullClient));
        assert_eq!(both.configured(), vec![Provider::OpenAI, Provider::Google]);
    }
}
