//! # nikzk-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to configurable port (default 8080).

use nikzk_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration failed: {e}");
        e
    })?;

    let state = AppState::from_config(&config).map_err(|e| {
        tracing::error!("Startup refused: {e}");
        e
    })?;

    for problem in state.readiness_problems() {
        tracing::warn!("{problem}; readiness probe will report 503");
    }
    tracing::info!(
        backend = %config.backend,
        policy = ?config.proof_policy.mode(),
        min_age = config.settings.admission.min_age,
        "proof backend configured"
    );

    let app = nikzk_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("nikzk API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
