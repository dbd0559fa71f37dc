// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for the gateway (defaults, env names, upstream paths, messages)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// User-facing response messages
pub mod messages;

/// API endpoints exposed by the gateway
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Readiness endpoint
    pub const READY: &str = "/ready";
    /// API base path
    pub const API_BASE: &str = "/api";
    /// Registration route (under `API_BASE`)
    pub const REGISTER: &str = "/register";
    /// User collection route (under `API_BASE`)
    pub const USERS: &str = "/users";
}

/// Upstream (Palmr API) endpoint paths relative to the base URL
pub mod upstream {
    /// Admin login endpoint
    pub const LOGIN_PATH: &str = "/auth/login";
    /// Account creation endpoint
    pub const REGISTER_PATH: &str = "/auth/register";
    /// JSON field and cookie attribute carrying the session token
    pub const TOKEN_FIELD: &str = "token";
    /// Optional JSON field with the token lifetime in seconds
    pub const EXPIRES_IN_FIELD: &str = "expiresIn";
    /// Service name used in logs and error messages
    pub const SERVICE_NAME: &str = "Palmr API";
}

/// Configuration defaults
pub mod defaults {
    /// Default bind address
    pub const HTTP_HOST: &str = "0.0.0.0";
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 5000;
    /// Default local database
    pub const DATABASE_URL: &str = "sqlite:./data/gateway.db";
    /// Default upstream base URL
    pub const UPSTREAM_BASE_URL: &str = "http://localhost:3333";
    /// Timeout applied to every outbound call (seconds)
    pub const UPSTREAM_TIMEOUT_SECS: u64 = 10;
    /// TCP connect timeout for outbound calls (seconds)
    pub const UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;
    /// Assumed admin token lifetime when upstream does not say (seconds)
    pub const ADMIN_TOKEN_LIFETIME_SECS: i64 = 3600;
    /// Tokens closer than this to expiry are refreshed (seconds)
    pub const ADMIN_TOKEN_SAFETY_MARGIN_SECS: i64 = 300;
    /// Service name for structured logging
    pub const SERVICE_NAME: &str = "palmr-gateway";
    /// How long a writer waits on a locked SQLite database (seconds)
    pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;
}

/// Registration validation limits
pub mod limits {
    /// Minimum display name length
    pub const MIN_NAME_LENGTH: usize = 2;
    /// Minimum username length
    pub const MIN_USERNAME_LENGTH: usize = 3;
    /// Minimum password length; configuration can raise but never lower it
    pub const MIN_PASSWORD_LENGTH: usize = 6;
    /// Lowest bcrypt cost the hasher accepts
    pub const MIN_HASH_COST: u32 = 4;
    /// Highest bcrypt cost the hasher accepts
    pub const MAX_HASH_COST: u32 = 31;
}

/// Environment variable names
pub mod env_vars {
    /// Bind address
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Bind port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Local database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Upstream base URL
    pub const UPSTREAM_BASE_URL: &str = "PALMR_API_BASE_URL";
    /// Upstream request timeout
    pub const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
    /// Upstream connect timeout
    pub const UPSTREAM_CONNECT_TIMEOUT_SECS: &str = "UPSTREAM_CONNECT_TIMEOUT_SECS";
    /// Assumed token lifetime
    pub const ADMIN_TOKEN_LIFETIME_SECS: &str = "ADMIN_TOKEN_LIFETIME_SECS";
    /// Token safety margin
    pub const ADMIN_TOKEN_SAFETY_MARGIN_SECS: &str = "ADMIN_TOKEN_SAFETY_MARGIN_SECS";
    /// Forced-refresh retry toggle
    pub const UPSTREAM_RETRY_ON_UNAUTHORIZED: &str = "UPSTREAM_RETRY_ON_UNAUTHORIZED";
    /// Base64 AES-256-GCM vault key
    pub const VAULT_KEY: &str = "GATEWAY_VAULT_KEY";
    /// Encrypted admin username
    pub const ADMIN_USERNAME_ENCRYPTED: &str = "ADMIN_USERNAME_ENCRYPTED";
    /// Encrypted admin password
    pub const ADMIN_PASSWORD_ENCRYPTED: &str = "ADMIN_PASSWORD_ENCRYPTED";
    /// Minimum name length
    pub const MIN_NAME_LENGTH: &str = "REGISTRATION_MIN_NAME_LENGTH";
    /// Minimum username length
    pub const MIN_USERNAME_LENGTH: &str = "REGISTRATION_MIN_USERNAME_LENGTH";
    /// Minimum password length
    pub const MIN_PASSWORD_LENGTH: &str = "REGISTRATION_MIN_PASSWORD_LENGTH";
    /// bcrypt cost for local password hashes
    pub const PASSWORD_HASH_COST: &str = "PASSWORD_HASH_COST";
    /// Allowed CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}
