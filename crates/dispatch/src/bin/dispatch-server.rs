//! Entry point of the label dispatch webhook service.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dispatch::labels::UserClusterLabels;
use dispatch::{AppState, Config};
use github::GitHubClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = Config::from_env()?;

    let mut client = GitHubClient::new(&config.github_token)?;
    if let Some(url) = &config.github_api_url {
        client = client.with_base_url(url.clone());
    }

    let users = UserClusterLabels::from_logins(&config.cluster_users);
    info!(cluster_users = users.len(), "Starting label dispatch service");

    let state = AppState {
        api: Arc::new(client),
        users: Arc::new(users),
        webhook_secret: config.webhook_secret.clone(),
    };
    let app = dispatch::server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening for webhook deliveries");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, draining");
}
