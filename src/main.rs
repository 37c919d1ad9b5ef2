//! Local AI Assistant
//!
//! A single-page chat server that forwards each message to Google Gemini
//! and keeps the conversation in memory for the life of the browser session.

mod api;
mod chat;
mod gateway;
mod llm;
mod session;
mod view;

use api::{create_router, AppState};
use gateway::ModelGateway;
use llm::{GeminiService, LlmConfig, LoggingService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8501;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "local_assistant=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let port: u16 = std::env::var("ASSISTANT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    // Provider
    let llm_config = LlmConfig::from_env();
    let gemini = GeminiService::new(&llm_config)?;
    let service = Arc::new(LoggingService::new(Arc::new(gemini)));
    let gateway = ModelGateway::new(llm_config.credential.clone(), service);

    if gateway.has_credential() {
        tracing::info!(
            model = %gateway.model_id(),
            timeout_secs = llm_config.timeout.as_secs(),
            "Gemini client initialized"
        );
    } else {
        tracing::warn!("No LLM API key configured. Set GEMINI_API_KEY.");
    }

    let state = AppState::new(Arc::new(gateway));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Local assistant listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
