// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness is static; readiness checks the local user store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Health check routes for service monitoring

use crate::constants::endpoints;
use crate::resources::ServerResources;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::HEALTH_CHECK, get(Self::handle_health))
            .route(endpoints::READY, get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": crate::constants::defaults::SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// Ready once the store answers; the admin token is not required
    async fn handle_ready(
        State(resources): State<Arc<ServerResources>>,
    ) -> (StatusCode, Json<Value>) {
        let database_ok = match resources.database.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Readiness check failed");
                false
            }
        };
        let token_cached = resources
            .token_cache
            .valid_token(
                chrono::Utc::now(),
                resources.config.upstream.token_safety_margin(),
            )
            .await
            .is_some();

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            status,
            Json(json!({
                "status": if database_ok { "ready" } else { "not_ready" },
                "checks": {
                    "database": database_ok,
                    "admin_token_cached": token_cached
                },
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
    }
}
