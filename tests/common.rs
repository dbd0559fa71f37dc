// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, in-memory store, sealed credentials, and a scriptable mock upstream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `palmr_gateway`
//!
//! [`MockUpstream`] stands in for the Palmr API: a real HTTP server on a
//! loopback port whose login and register answers are set per test and
//! whose calls are counted.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use palmr_gateway::{
    config::{
        CorsConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, RegistrationConfig,
        ServerConfig, UpstreamConfig, VaultConfig,
    },
    crypto::{AesGcmVault, EncryptedAdminCredentials},
    database::Database,
    resources::ServerResources,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::net::TcpListener;

static INIT_LOGGER: Once = Once::new();

/// Admin login the mock upstream accepts
pub const ADMIN_USERNAME: &str = "admin@palmr.local";
/// Admin password the mock upstream accepts
pub const ADMIN_PASSWORD: &str = "adminpass";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Arc<Database> {
    init_test_logging();
    Arc::new(Database::new("sqlite::memory:").await.unwrap())
}

const TEST_KEY: [u8; 32] = [7u8; 32];

/// Vault with a fixed key so tests are reproducible
pub fn test_vault() -> AesGcmVault {
    AesGcmVault::from_bytes(TEST_KEY)
}

/// The `test_vault` key as it would appear in `GATEWAY_VAULT_KEY`
pub fn test_vault_key_base64() -> String {
    STANDARD.encode(TEST_KEY)
}

/// A different key; credentials sealed with it never open under `test_vault`
pub fn foreign_vault() -> AesGcmVault {
    AesGcmVault::from_bytes([9u8; 32])
}

/// Admin credentials sealed under `vault`
pub fn sealed_credentials(vault: &AesGcmVault) -> EncryptedAdminCredentials {
    EncryptedAdminCredentials::seal(vault, ADMIN_USERNAME, ADMIN_PASSWORD).unwrap()
}

/// Configuration pointing at `base_url` with cheap hashing and short timeouts
pub fn test_config(base_url: &str) -> ServerConfig {
    ServerConfig {
        http_host: "127.0.0.1".to_owned(),
        http_port: 0,
        log_level: LogLevel::Debug,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        upstream: UpstreamConfig {
            base_url: base_url.to_owned(),
            request_timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_millis(500),
            ..UpstreamConfig::default()
        },
        vault: VaultConfig::default(),
        registration: RegistrationConfig {
            password_hash_cost: 4,
            ..RegistrationConfig::default()
        },
        cors: CorsConfig {
            allowed_origins: "*".to_owned(),
        },
    }
}

/// Resources wired to a fresh in-memory store and the test vault
pub async fn create_test_resources(config: ServerConfig) -> Arc<ServerResources> {
    let vault = test_vault();
    let credentials = sealed_credentials(&vault);
    create_resources_with_credentials(config, credentials).await
}

/// Resources whose stored credentials were sealed by the caller
pub async fn create_resources_with_credentials(
    config: ServerConfig,
    credentials: EncryptedAdminCredentials,
) -> Arc<ServerResources> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await.unwrap();
    Arc::new(
        ServerResources::new(config, database, Arc::new(test_vault()), credentials).unwrap(),
    )
}

/// Base URL of a loopback port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// How the mock answers `POST /auth/login`
#[derive(Debug, Clone)]
pub enum LoginBehavior {
    /// 200 with `{"token": "T<n>"}` where n counts logins, plus `expiresIn` if set
    JsonToken { expires_in: Option<i64> },
    /// 200 with a JSON body lacking a token and this `Set-Cookie` header
    Cookie(String),
    /// 200 with a body that carries no token at all
    NoToken,
    /// This status with an error body
    Status(u16),
    /// Sleep before answering like `JsonToken`
    Delay(Duration),
}

/// How the mock answers `POST /auth/register`
#[derive(Debug, Clone)]
pub enum RegisterBehavior {
    /// This status with a small JSON body
    Status(u16),
    /// Sleep, then 201
    Delay(Duration),
    /// 401 when the bearer is this token, 201 otherwise
    RejectToken(String),
}

/// Recorded traffic and scripted answers
pub struct MockState {
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    login: Mutex<LoginBehavior>,
    register: Mutex<Vec<RegisterBehavior>>,
    pub last_login_body: Mutex<Option<Value>>,
    pub last_register_body: Mutex<Option<Value>>,
    pub last_authorization: Mutex<Option<String>>,
}

/// Scriptable stand-in for the Palmr API
pub struct MockUpstream {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    /// Start a mock that logs in with rotating JSON tokens and registers with 201
    pub async fn start() -> Self {
        Self::start_with(
            LoginBehavior::JsonToken { expires_in: None },
            RegisterBehavior::Status(201),
        )
        .await
    }

    /// Start a mock with explicit behaviors
    pub async fn start_with(login: LoginBehavior, register: RegisterBehavior) -> Self {
        init_test_logging();
        let state = Arc::new(MockState {
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            login: Mutex::new(login),
            register: Mutex::new(vec![register]),
            last_login_body: Mutex::new(None),
            last_register_body: Mutex::new(None),
            last_authorization: Mutex::new(None),
        });

        let app = Router::new()
            .route("/auth/login", post(handle_login))
            .route("/auth/register", post(handle_register))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Replace the login behavior
    pub fn set_login(&self, behavior: LoginBehavior) {
        *self.state.login.lock().unwrap() = behavior;
    }

    /// Answer successive registrations in order; the last entry repeats
    pub fn set_register_sequence(&self, behaviors: Vec<RegisterBehavior>) {
        assert!(!behaviors.is_empty());
        *self.state.register.lock().unwrap() = behaviors;
    }

    /// Replace the register behavior
    pub fn set_register(&self, behavior: RegisterBehavior) {
        self.set_register_sequence(vec![behavior]);
    }

    pub fn login_calls(&self) -> usize {
        self.state.login_calls.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.state.register_calls.load(Ordering::SeqCst)
    }

    pub fn last_login_body(&self) -> Option<Value> {
        self.state.last_login_body.lock().unwrap().clone()
    }

    pub fn last_register_body(&self) -> Option<Value> {
        self.state.last_register_body.lock().unwrap().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

async fn handle_login(State(state): State<Arc<MockState>>, body: Option<Json<Value>>) -> Response {
    let call = state.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
    *state.last_login_body.lock().unwrap() = body.map(|Json(b)| b);
    let behavior = state.login.lock().unwrap().clone();

    match behavior {
        LoginBehavior::JsonToken { expires_in } => json_token(call, expires_in),
        LoginBehavior::Delay(delay) => {
            tokio::time::sleep(delay).await;
            json_token(call, None)
        }
        LoginBehavior::Cookie(cookie) => (
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(json!({ "user": { "id": "admin-1", "isAdmin": true } })),
        )
            .into_response(),
        LoginBehavior::NoToken => (
            StatusCode::OK,
            Json(json!({ "user": { "id": "admin-1" } })),
        )
            .into_response(),
        LoginBehavior::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "error": "login refused" })),
        )
            .into_response(),
    }
}

fn json_token(call: usize, expires_in: Option<i64>) -> Response {
    let mut body = json!({ "token": format!("T{call}") });
    if let Some(secs) = expires_in {
        body["expiresIn"] = json!(secs);
    }
    (StatusCode::OK, Json(body)).into_response()
}

async fn handle_register(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let index = state.register_calls.fetch_add(1, Ordering::SeqCst);
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state.last_authorization.lock().unwrap() = authorization.clone();
    *state.last_register_body.lock().unwrap() = body.map(|Json(b)| b);

    let behavior = {
        let sequence = state.register.lock().unwrap();
        sequence[index.min(sequence.len() - 1)].clone()
    };

    let status = match behavior {
        RegisterBehavior::Status(code) => code,
        RegisterBehavior::Delay(delay) => {
            tokio::time::sleep(delay).await;
            201
        }
        RegisterBehavior::RejectToken(token) => {
            if authorization.as_deref() == Some(format!("Bearer {token}").as_str()) {
                401
            } else {
                201
            }
        }
    };

    (
        StatusCode::from_u16(status).unwrap(),
        Json(json!({ "status": status })),
    )
        .into_response()
}
