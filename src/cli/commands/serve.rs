use anyhow::Context;
use tokio::net::TcpListener;

use crate::app::{app, AppState};
use crate::config::AppConfig;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting drinks API in {:?} mode", config.environment);

    let state = AppState::from_config(&config).await?;
    let router = app(state.clone(), &config.security);

    let bind_addr = format!("{}:{}", config.api.bind_host, config.api.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    state.pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
