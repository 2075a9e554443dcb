// Liveness endpoint for hosts that expect the process to answer HTTP.
// Shares nothing with the bot; it only proves the process is up.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;

const ALIVE_MESSAGE: &str = "Streaks Bot is alive!";

/// Creates the health-check router. Every GET answers 200.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(health_check))
        .fallback(health_check)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, ALIVE_MESSAGE)
}

/// Bind to `0.0.0.0:port` and serve until the process exits.
pub async fn run(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Health check listening on http://{}", addr);

    axum::serve(listener, create_router()).await?;
    Ok(())
}
