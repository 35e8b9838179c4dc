use crate::config::Config;
use sift_agent::{ProviderRegistry, SessionConfig};
use std::sync::Arc;

/// Shared application state passed to all handlers
///
/// The registry and config are built once at startup and shared read-only;
/// everything request-scoped (sessions, tool contexts) is created inside
/// the handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<ProviderRegistry>,
    pub session_config: SessionConfig,
}

impl AppState {
    pub fn new(config: Config, registry: ProviderRegistry) -> Self {
        let session_config = SessionConfig::new()
            .with_temperature(config.llm.temperature)
            .with_max_tokens(config.llm.max_tokens);

        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            session_config,
        }
    }
}
