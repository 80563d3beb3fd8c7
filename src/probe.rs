//! Liveness probe. Carries no monitoring logic.

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

pub const PROBE_RESPONSE: &str = "HTTP trigger test successful";

pub fn router() -> Router {
    Router::new().route("/api/test", get(http_test))
}

async fn http_test() -> &'static str {
    info!("HTTP probe called at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    PROBE_RESPONSE
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind probe endpoint on {}", addr))
}

pub async fn serve(listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Probe endpoint listening on http://{}/api/test", addr);
    axum::serve(listener, router())
        .await
        .context("Probe endpoint stopped")
}
