//! Signboard Remote Trigger Server
//!
//! Lets another device on the network open or close the display's stream
//! views over plain HTTP.
//!
//! ## Endpoints
//!
//! - `POST /trigger` toggles the remote camera view for the calling device
//! - `GET /toggle-stream` toggles the local camera stream
//! - `GET /health` liveness check

use clap::Parser;
use signboard_server::{ServerArgs, StreamRegistry, ViewCommand, router};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signboard_server=info,tower_http=info".into()),
        )
        .init();

    let args = ServerArgs::parse();
    let registry = Arc::new(StreamRegistry::new());
    tokio::spawn(log_display(registry.subscribe()));

    let app = router(registry);

    let addr = args.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Signboard trigger server listening on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Headless display: reports view commands in the log.
async fn log_display(mut rx: tokio::sync::broadcast::Receiver<ViewCommand>) {
    loop {
        match rx.recv().await {
            Ok(ViewCommand::Open { view, remote_addr }) => info!("Display: open {:?} ({:?})", view, remote_addr),
            Ok(ViewCommand::Close { view }) => info!("Display: close {:?}", view),
            Err(RecvError::Lagged(skipped)) => warn!("Display missed {} commands", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
