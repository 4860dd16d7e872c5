//! HTTP routes.

use crate::registry::{RegistryError, StreamRegistry, StreamView, ToggleOutcome};
use axum::{
    Router,
    extract::{ConnectInfo, State},
    http::StatusCode,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

type Reply = (StatusCode, &'static str);

pub fn router(registry: Arc<StreamRegistry>) -> Router {
    Router::new()
        .route("/trigger", post(trigger).fallback(method_not_allowed))
        .route("/toggle-stream", get(toggle_stream).fallback(not_found))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(registry)
}

/// Toggle the remote camera view for the calling device.
async fn trigger(State(registry): State<Arc<StreamRegistry>>, ConnectInfo(peer): ConnectInfo<SocketAddr>) -> Reply {
    info!("Trigger from {}", peer.ip());
    match registry.toggle(StreamView::RemoteCamera, Some(peer.ip())) {
        Ok(ToggleOutcome::Opened) => (StatusCode::OK, "Remote stream started."),
        Ok(ToggleOutcome::Closed) => (StatusCode::OK, "Remote stream stopped."),
        Err(RegistryError::NoDisplay) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error: no display attached."),
    }
}

/// Toggle this device's own camera stream.
async fn toggle_stream(State(registry): State<Arc<StreamRegistry>>) -> Reply {
    if let Err(e) = registry.toggle(StreamView::LocalStream, None) {
        warn!("Local stream toggle ignored: {}", e);
    }
    (StatusCode::OK, "Signal received, toggling local stream.")
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn method_not_allowed() -> Reply {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

async fn not_found() -> Reply {
    (StatusCode::NOT_FOUND, "Not Found")
}
