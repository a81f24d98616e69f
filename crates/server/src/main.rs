use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();
    info!("Starting CineIntel backend");

    // Load and train before binding; a failure here aborts startup
    let data_dir = config.data_dir.clone();
    let training = config.training_config();
    let state = tokio::task::spawn_blocking(move || AppState::load(&data_dir, &training))
        .await
        .context("Startup task panicked")??;
    info!(
        "Data loaded: {} movies, model accuracy {:.2}%",
        state.data.movies().len(),
        state.predictor.accuracy() * 100.0
    );

    let app = create_router(state)
        .layer(config.cors_layer()?)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
