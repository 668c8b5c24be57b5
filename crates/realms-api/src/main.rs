//! Infinite Realms API server entry point.

use std::sync::Arc;
use std::time::Duration;

use realms_api::config::ServerConfig;
use realms_api::error::AppError;
use realms_api::state::AppState;
use realms_api::telemetry;
use realms_core::clock::SystemClock;
use realms_gemini::{GeminiBackend, GeminiConfig};
use realms_narrative::application::sessions::GameSessions;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let telemetry = telemetry::init(std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok())?;

    info!(
        otlp = telemetry.exports_spans(),
        "Starting Infinite Realms API server"
    );

    // Read configuration from environment.
    let server = ServerConfig::from_env()?;
    let gemini = GeminiConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
    info!(
        text_model = %gemini.text_model,
        image_model = %gemini.image_model,
        "using Gemini backend"
    );
    let backend = GeminiBackend::new(gemini).map_err(|e| AppError::Config(e.to_string()))?;

    // Build application state.
    let sessions = GameSessions::with_limits(
        Arc::new(backend),
        Arc::new(SystemClock),
        server.session_limits,
    );
    let state = AppState::new(sessions);
    tokio::spawn(evict_idle_sessions(Arc::clone(&state.sessions)));
    let app = realms_api::app(state);

    // Start server.
    let addr = server.socket_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    telemetry.shutdown();

    Ok(())
}

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

async fn evict_idle_sessions(sessions: Arc<GameSessions>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let evicted = sessions.evict_idle();
        if evicted > 0 {
            info!(evicted, live = sessions.len(), "evicted idle game sessions");
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
