// ABOUTME: POST /api/register handler mapping RegistrationOutcome to HTTP responses
// ABOUTME: 201 for created (with a warning when upstream failed), 400/409/500 with a message otherwise

use crate::constants::{endpoints, messages};
use crate::registration::{ConflictField, RegistrationOutcome, RegistrationRequest, RejectionReason};
use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Registration routes
pub struct RegistrationRoutes;

impl RegistrationRoutes {
    /// Create the registration route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                &format!("{}{}", endpoints::API_BASE, endpoints::REGISTER),
                post(Self::handle_register),
            )
            .with_state(resources)
    }

    /// Handle POST /api/register
    ///
    /// A body that is absent or not a JSON object is treated as a request
    /// with every field missing.
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        body: Option<Json<RegistrationRequest>>,
    ) -> Response {
        let request = body.map(|Json(request)| request).unwrap_or_default();
        let outcome = resources.orchestrator.register(request).await;
        outcome_response(outcome)
    }
}

/// HTTP rendering of a registration outcome
#[must_use]
pub fn outcome_response(outcome: RegistrationOutcome) -> Response {
    match outcome {
        RegistrationOutcome::Created(user) => (
            StatusCode::CREATED,
            Json(json!({
                "message": messages::REGISTRATION_SUCCESS,
                "user": user
            })),
        )
            .into_response(),
        RegistrationOutcome::CreatedWithUpstreamWarning { user, .. } => (
            StatusCode::CREATED,
            Json(json!({
                "message": messages::REGISTRATION_LOCAL_ONLY,
                "user": user,
                "warning": messages::UPSTREAM_WARNING
            })),
        )
            .into_response(),
        RegistrationOutcome::Rejected(reason) => {
            let (status, message) = match reason {
                RejectionReason::Validation(message) => (StatusCode::BAD_REQUEST, message),
                RejectionReason::Conflict(ConflictField::Username) => {
                    (StatusCode::CONFLICT, messages::USERNAME_EXISTS.to_owned())
                }
                RejectionReason::Conflict(ConflictField::Email) => {
                    (StatusCode::CONFLICT, messages::EMAIL_EXISTS.to_owned())
                }
                RejectionReason::InternalError => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::REGISTRATION_FAILED.to_owned(),
                ),
            };
            (status, Json(json!({ "message": message }))).into_response()
        }
    }
}
