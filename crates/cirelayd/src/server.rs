//! HTTP surface: one webhook endpoint in front of the relay.

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use cirelay_core::{ChatDirectory, Relay, RelayError, RelayResponse};
use tokio::net::TcpListener;
use tracing::info;

pub const GITHUB_WEBHOOK_ENDPOINT: &str = "/github";

/// Relay shared by all request handlers.
pub type SharedRelay = Relay<dyn ChatDirectory>;

pub fn build_router(relay: SharedRelay) -> Router {
    Router::new()
        .route(GITHUB_WEBHOOK_ENDPOINT, post(handle_github_webhook))
        .with_state(relay)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, relay: SharedRelay) -> Result<()> {
    axum::serve(listener, build_router(relay))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .context("webhook server exited unexpectedly")
}

/// Take the raw body so undecodable payloads reach the fallback decoder.
pub async fn handle_github_webhook(
    State(relay): State<SharedRelay>,
    body: Bytes,
) -> (StatusCode, Json<RelayResponse>) {
    let result = relay.handle(&body).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => status_for(err),
    };
    (status, Json(RelayResponse::from_result(&result)))
}

fn status_for(err: &RelayError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if matches!(err, RelayError::Directory(_)) {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
