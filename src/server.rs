// ABOUTME: HTTP server assembly: router composition, middleware stack, and serve loop
// ABOUTME: Binds the configured address and shuts down gracefully on Ctrl-C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

use crate::middleware::{request_id_middleware, setup_cors};
use crate::resources::ServerResources;
use crate::routes::{HealthRoutes, RegistrationRoutes, UserRoutes};
use anyhow::{Context, Result};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Full gateway router with middleware applied
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(RegistrationRoutes::routes(resources.clone()))
        .merge(UserRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

/// Serve on the configured host and port until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the address is invalid, cannot be bound, or the
/// server fails while running
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        resources.config.http_host, resources.config.http_port
    )
    .parse()
    .context("Invalid HTTP_HOST/HTTP_PORT")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    serve(listener, resources).await
}

/// Serve on an already bound listener until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the server fails while running
pub async fn serve(listener: TcpListener, resources: Arc<ServerResources>) -> Result<()> {
    let database = resources.database.clone();
    let app = build_router(resources);

    info!(addr = %listener.local_addr()?, "Palmr gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    database.close().await;
    info!("Palmr gateway stopped");
    Ok(())
}

/// Wait for Ctrl-C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating shutdown"),
        () = terminate => info!("Received SIGTERM, initiating shutdown"),
    }
}
