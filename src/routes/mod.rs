// ABOUTME: HTTP route modules for the gateway
// ABOUTME: Registration, user administration, and health endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Route handlers
//!
//! Each module exposes a `*Routes` type whose `routes` function returns an
//! `axum::Router` with its state already applied.

/// Liveness and readiness
pub mod health;
/// End-user registration
pub mod registration;
/// User record administration
pub mod users;

pub use health::HealthRoutes;
pub use registration::RegistrationRoutes;
pub use users::UserRoutes;
