// ABOUTME: User administration routes over the local store
// ABOUTME: List, create, get, update, and delete records; never touches upstream

use crate::constants::{endpoints, messages};
use crate::errors::AppError;
use crate::middleware::RequestId;
use crate::models::{NewUser, User, UserUpdate};
use crate::registration::validation::is_valid_email;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Body of POST /api/users
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    /// Display name
    pub name: String,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
}

/// User administration routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let collection = format!("{}{}", endpoints::API_BASE, endpoints::USERS);
        let item = format!("{collection}/:id");
        Router::new()
            .route(&collection, get(Self::handle_list).post(Self::handle_create))
            .route(
                &item,
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /api/users
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
    ) -> Result<Json<Vec<User>>, AppError> {
        let users = resources
            .users
            .list_all()
            .await
            .map_err(|e| tag(e.into(), &request_id))?;
        Ok(Json(users))
    }

    /// Handle POST /api/users - direct local create without upstream mirror
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        Json(body): Json<CreateUserBody>,
    ) -> Result<Response, AppError> {
        let new_user = NewUser {
            name: body.name.trim().to_owned(),
            username: body.username.trim().to_owned(),
            email: body.email.trim().to_lowercase(),
            password_hash: String::new(),
        };
        validate_identity(&new_user.name, &new_user.username, &new_user.email)
            .map_err(|e| tag(e, &request_id))?;

        let user = resources
            .users
            .create(&new_user)
            .await
            .map_err(|e| tag(e.into(), &request_id))?;
        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    /// Handle GET /api/users/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<User>, AppError> {
        resources
            .users
            .get(id)
            .await
            .map_err(|e| tag(e.into(), &request_id))?
            .map(Json)
            .ok_or_else(|| tag(AppError::not_found("User"), &request_id))
    }

    /// Handle PUT /api/users/:id - partial update of name, username, email
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        Path(id): Path<Uuid>,
        Json(update): Json<UserUpdate>,
    ) -> Result<Json<User>, AppError> {
        let update = UserUpdate {
            name: update.name.map(|n| n.trim().to_owned()),
            username: update.username.map(|u| u.trim().to_owned()),
            email: update.email.map(|e| e.trim().to_lowercase()),
        };
        if update.name.as_deref().is_some_and(str::is_empty)
            || update.username.as_deref().is_some_and(str::is_empty)
        {
            return Err(tag(
                AppError::invalid_input("Name and username cannot be empty"),
                &request_id,
            ));
        }
        if update.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            return Err(tag(AppError::invalid_input(messages::INVALID_EMAIL), &request_id));
        }

        let user = resources
            .users
            .update(id, &update)
            .await
            .map_err(|e| tag(e.into(), &request_id))?;
        Ok(Json(user))
    }

    /// Handle DELETE /api/users/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        Path(id): Path<Uuid>,
    ) -> Result<StatusCode, AppError> {
        resources
            .users
            .delete(id)
            .await
            .map_err(|e| tag(e.into(), &request_id))?;
        Ok(StatusCode::NO_CONTENT)
    }
}

fn tag(error: AppError, request_id: &RequestId) -> AppError {
    error.with_request_id(request_id.as_str())
}

fn validate_identity(name: &str, username: &str, email: &str) -> Result<(), AppError> {
    if name.is_empty() || username.is_empty() || email.is_empty() {
        return Err(AppError::invalid_input("Name, username, and email are required"));
    }
    if !is_valid_email(email) {
        return Err(AppError::invalid_input(messages::INVALID_EMAIL));
    }
    Ok(())
}
