use server::clients::EvalService;
use server::config;
use server::session::SessionStore;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    let evals = EvalService::from_config(&config);
    tracing::info!(backend = evals.backend_name(), "Evaluation backend configured");

    let store = SessionStore::new(config.session_ttl(), config.back_rollback);
    tracing::info!(
        ttl_secs = config.session_ttl_secs,
        rollback = ?config.back_rollback,
        "Session store ready"
    );

    let app = server::app(&config, store, evals.clone());

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    evals.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
    }
}
