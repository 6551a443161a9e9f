mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod tailoring;
mod workspace;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, TailorBackend};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::tailor::{LlmTailor, StubTailor, Tailor};
use crate::workspace::credential::CredentialHolder;
use crate::workspace::Workspace;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Credential: a persisted key wins over ANTHROPIC_API_KEY
    let mut workspace = Workspace::new(config.credential_path.clone());
    load_credential(&config, &mut workspace.credential).await;

    let tailor: Arc<dyn Tailor> = match config.backend {
        TailorBackend::Stub => {
            info!("Tailoring backend: stub ({}ms delay)", config.stub_delay.as_millis());
            Arc::new(StubTailor::new(config.stub_delay))
        }
        TailorBackend::Anthropic => {
            info!(
                "Tailoring backend: anthropic (model: {}, base: {}, attempts: {})",
                llm_client::MODEL,
                config.anthropic_base_url,
                config.anthropic_max_attempts
            );
            let llm = LlmClient::new(config.anthropic_base_url.clone())
                .with_max_attempts(config.anthropic_max_attempts);
            Arc::new(LlmTailor::new(llm))
        }
    };

    let state = AppState::new(workspace, tailor);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the persisted key, falling back to the environment.
/// A broken credential file is logged, not fatal.
async fn load_credential(config: &Config, credential: &mut CredentialHolder) {
    match credential.load().await {
        Ok(true) => return,
        Ok(false) => {}
        Err(e) => warn!("Ignoring unreadable credential file: {e}"),
    }

    if let Some(key) = &config.anthropic_api_key {
        credential.set(key.clone());
    }
}
