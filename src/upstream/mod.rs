// ABOUTME: Upstream identity API integration: admin token caching, login, and registration
// ABOUTME: Leaf-first layering of TokenCache, cookie parsing, AdminAuthenticator, and RegistrationClient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Upstream Integration
//!
//! Privileged calls to the Palmr API are authenticated with one shared admin
//! session token. The layers are:
//!
//! - [`TokenCache`]: single-slot, process-wide `(token, expires_at)` store
//! - [`cookie`]: `Set-Cookie` attribute parsing for the token fallback
//! - [`AdminAuthenticator`]: login call, response parsing, cache population
//! - [`RegistrationClient`]: bearer-authenticated account creation
//!
//! No lock is ever held across a network call. Concurrent cache misses may
//! each log in; the last writer wins and every stored token is valid.

/// Admin login and token acquisition
pub mod authenticator;
/// Upstream account creation
pub mod client;
/// `Set-Cookie` attribute parsing
pub mod cookie;
/// Single-slot admin token cache
pub mod token_cache;

pub use authenticator::{AdminAuthenticator, TokenPolicy};
pub use client::RegistrationClient;
pub use token_cache::TokenCache;
