use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sift_agent::ProviderRegistry;
use sift_api::{build_router, config::Config, state::AppState};
use sift_llm::{GoogleClient, OpenAIClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Fails fast when neither provider credential is configured
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Sift API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let registry = build_registry(&config)?;

    let state = Arc::new(AppState::new(config.clone(), registry));

    let app = build_router(state.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_registry(config: &Config) -> anyhow::Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    if let Some(key) = &config.openai_api_key {
        registry = registry.with_openai(Arc::new(OpenAIClient::new(key.clone())?));
        tracing::info!("OpenAI provider configured");
    }

    if let Some(key) = &config.gemini_api_key {
        registry = registry.with_google(Arc::new(GoogleClient::new(key.clone())?));
        tracing::info!("Gemini provider configured");
    }

    Ok(registry)
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
