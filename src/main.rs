use anyhow::{Context, Result};
use contest_sync::config::AppConfig;
use contest_sync::server::{bootstrap, init_tracing, shutdown_signal};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = AppConfig::from_env().context("failed to read config")?;
    let router = bootstrap(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .context("failed to bind listener")?;
    info!(addr = %config.bind_addr(), "contest scoring server ready, data is shared by all clients");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum serve error")?;

    info!("server stopped");
    Ok(())
}
