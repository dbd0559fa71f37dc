// ABOUTME: Main library entry point for the Palmr registration gateway
// ABOUTME: Local signup with a best-effort mirror to the Palmr identity API via a cached admin token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

#![deny(unsafe_code)]

//! # Palmr Gateway
//!
//! Accepts end-user registrations, persists them locally, and mirrors each
//! account to the Palmr API using one shared administrative session token.
//!
//! ## Architecture
//!
//! - **Upstream**: token cache, admin login, and account creation
//! - **Registration**: validation and the orchestrating state machine
//! - **Database**: SQLite user store behind `UserRepository`
//! - **Crypto**: AES-256-GCM vault for the admin credentials
//! - **Routes**: `/api/register`, `/api/users`, `/health`, `/ready`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use palmr_gateway::config::environment::ServerConfig;
//! use palmr_gateway::resources::ServerResources;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config).await?);
//!     palmr_gateway::server::run(resources).await
//! }
//! ```

/// Configuration management
pub mod config;

/// Shared constants
pub use gateway_core::constants;

/// Credential vault
pub mod crypto;

/// Local user store
pub mod database;

/// Error types
pub mod errors;

/// Logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Domain models
pub use gateway_core::models;

/// Registration validation and orchestration
pub mod registration;

/// Shared server state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serve loop
pub mod server;

/// Upstream identity API integration
pub mod upstream;

/// Utility helpers
pub mod utils;
