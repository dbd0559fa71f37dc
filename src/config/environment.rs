// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses bind address, local store, upstream, vault, and validation settings from env
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, env_vars, limits};
use anyhow::{anyhow, Context, Result};
use chrono::Duration as ChronoDuration;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Default level
    #[default]
    Info,
    /// Verbose
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe local database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string; anything without the `sqlite:` prefix is a file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        match s.strip_prefix("sqlite:") {
            Some(":memory:") => Self::Memory,
            Some(path) => Self::SQLite {
                path: PathBuf::from(path),
            },
            None => Self::SQLite {
                path: PathBuf::from(s),
            },
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Complete gateway configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub http_host: String,
    /// Bind port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Local user store
    pub database: DatabaseConfig,
    /// Upstream identity API
    pub upstream: UpstreamConfig,
    /// Encrypted admin credentials
    pub vault: VaultConfig,
    /// Registration validation rules
    pub registration: RegistrationConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
}

/// Local user store settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: DatabaseUrl,
}

/// Upstream identity API settings
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL, e.g. `http://192.168.88.3:3333`
    pub base_url: String,
    /// Timeout for every outbound call
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Assumed admin token lifetime when upstream does not report one
    pub token_lifetime_secs: i64,
    /// Margin before expiry at which a token is no longer handed out
    pub token_safety_margin_secs: i64,
    /// Invalidate the token and retry once when upstream answers 401/403
    pub retry_on_unauthorized: bool,
}

impl UpstreamConfig {
    /// Assumed token lifetime
    #[must_use]
    pub fn token_lifetime(&self) -> ChronoDuration {
        ChronoDuration::seconds(self.token_lifetime_secs)
    }

    /// Token safety margin
    #[must_use]
    pub fn token_safety_margin(&self) -> ChronoDuration {
        ChronoDuration::seconds(self.token_safety_margin_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::UPSTREAM_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(defaults::UPSTREAM_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(defaults::UPSTREAM_CONNECT_TIMEOUT_SECS),
            token_lifetime_secs: defaults::ADMIN_TOKEN_LIFETIME_SECS,
            token_safety_margin_secs: defaults::ADMIN_TOKEN_SAFETY_MARGIN_SECS,
            retry_on_unauthorized: true,
        }
    }
}

/// Vault key and encrypted admin credentials
#[derive(Clone, Default)]
pub struct VaultConfig {
    /// Base64 AES-256-GCM key
    pub key: Option<String>,
    /// Ciphertext of the admin username
    pub admin_username_encrypted: Option<String>,
    /// Ciphertext of the admin password
    pub admin_password_encrypted: Option<String>,
}

impl VaultConfig {
    /// Vault key, required by the server
    ///
    /// # Errors
    ///
    /// Returns an error if `GATEWAY_VAULT_KEY` is not set
    pub fn require_key(&self) -> Result<&str> {
        self.key
            .as_deref()
            .ok_or_else(|| anyhow!("{} is required", env_vars::VAULT_KEY))
    }

    /// Both admin credential ciphertexts, required by the server
    ///
    /// # Errors
    ///
    /// Returns an error if either ciphertext variable is not set
    pub fn require_admin_credentials(&self) -> Result<(&str, &str)> {
        let username = self
            .admin_username_encrypted
            .as_deref()
            .ok_or_else(|| anyhow!("{} is required", env_vars::ADMIN_USERNAME_ENCRYPTED))?;
        let password = self
            .admin_password_encrypted
            .as_deref()
            .ok_or_else(|| anyhow!("{} is required", env_vars::ADMIN_PASSWORD_ENCRYPTED))?;
        Ok((username, password))
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("key", &self.key.as_ref().map(|_| "<set>"))
            .field(
                "admin_username_encrypted",
                &self.admin_username_encrypted.is_some(),
            )
            .field(
                "admin_password_encrypted",
                &self.admin_password_encrypted.is_some(),
            )
            .finish()
    }
}

/// Registration validation rules and local password hashing
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// Minimum trimmed name length
    pub min_name_length: usize,
    /// Minimum trimmed username length
    pub min_username_length: usize,
    /// Minimum password length (never below 6)
    pub min_password_length: usize,
    /// bcrypt cost for local password hashes
    pub password_hash_cost: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            min_name_length: limits::MIN_NAME_LENGTH,
            min_username_length: limits::MIN_USERNAME_LENGTH,
            min_password_length: limits::MIN_PASSWORD_LENGTH,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Cross-origin settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` or a comma-separated origin list
    pub allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value or the
    /// resulting configuration fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_host: env_var_or(env_vars::HTTP_HOST, defaults::HTTP_HOST),
            http_port: parse_env(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    env_vars::DATABASE_URL,
                    defaults::DATABASE_URL,
                )),
            },
            upstream: UpstreamConfig {
                base_url: env_var_or(env_vars::UPSTREAM_BASE_URL, defaults::UPSTREAM_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned(),
                request_timeout: Duration::from_secs(parse_env(
                    env_vars::UPSTREAM_TIMEOUT_SECS,
                    defaults::UPSTREAM_TIMEOUT_SECS,
                )?),
                connect_timeout: Duration::from_secs(parse_env(
                    env_vars::UPSTREAM_CONNECT_TIMEOUT_SECS,
                    defaults::UPSTREAM_CONNECT_TIMEOUT_SECS,
                )?),
                token_lifetime_secs: parse_env(
                    env_vars::ADMIN_TOKEN_LIFETIME_SECS,
                    defaults::ADMIN_TOKEN_LIFETIME_SECS,
                )?,
                token_safety_margin_secs: parse_env(
                    env_vars::ADMIN_TOKEN_SAFETY_MARGIN_SECS,
                    defaults::ADMIN_TOKEN_SAFETY_MARGIN_SECS,
                )?,
                retry_on_unauthorized: parse_bool(
                    env_vars::UPSTREAM_RETRY_ON_UNAUTHORIZED,
                    true,
                )?,
            },
            vault: VaultConfig {
                key: non_empty_var(env_vars::VAULT_KEY),
                admin_username_encrypted: non_empty_var(env_vars::ADMIN_USERNAME_ENCRYPTED),
                admin_password_encrypted: non_empty_var(env_vars::ADMIN_PASSWORD_ENCRYPTED),
            },
            registration: RegistrationConfig {
                min_name_length: parse_env(env_vars::MIN_NAME_LENGTH, limits::MIN_NAME_LENGTH)?,
                min_username_length: parse_env(
                    env_vars::MIN_USERNAME_LENGTH,
                    limits::MIN_USERNAME_LENGTH,
                )?,
                min_password_length: parse_env(
                    env_vars::MIN_PASSWORD_LENGTH,
                    limits::MIN_PASSWORD_LENGTH,
                )?,
                password_hash_cost: parse_env(env_vars::PASSWORD_HASH_COST, bcrypt::DEFAULT_COST)?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(env_vars::CORS_ALLOWED_ORIGINS, "*"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        let base = &self.upstream.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(anyhow!(
                "{} must be an http(s) URL, got '{base}'",
                env_vars::UPSTREAM_BASE_URL
            ));
        }

        if self.upstream.request_timeout.is_zero() {
            return Err(anyhow!("{} must be positive", env_vars::UPSTREAM_TIMEOUT_SECS));
        }

        if self.upstream.token_safety_margin_secs < 0 {
            return Err(anyhow!(
                "{} must not be negative",
                env_vars::ADMIN_TOKEN_SAFETY_MARGIN_SECS
            ));
        }

        if self.upstream.token_lifetime_secs <= self.upstream.token_safety_margin_secs {
            return Err(anyhow!(
                "{} ({}) must exceed {} ({}), otherwise every token is stale on arrival",
                env_vars::ADMIN_TOKEN_LIFETIME_SECS,
                self.upstream.token_lifetime_secs,
                env_vars::ADMIN_TOKEN_SAFETY_MARGIN_SECS,
                self.upstream.token_safety_margin_secs
            ));
        }

        if self.registration.min_password_length < limits::MIN_PASSWORD_LENGTH {
            return Err(anyhow!(
                "{} must be at least {}",
                env_vars::MIN_PASSWORD_LENGTH,
                limits::MIN_PASSWORD_LENGTH
            ));
        }

        if !(limits::MIN_HASH_COST..=limits::MAX_HASH_COST)
            .contains(&self.registration.password_hash_cost)
        {
            return Err(anyhow!(
                "{} must be between {} and {}",
                env_vars::PASSWORD_HASH_COST,
                limits::MIN_HASH_COST,
                limits::MAX_HASH_COST
            ));
        }

        if self.environment.is_production() && self.cors.allowed_origins.trim() == "*" {
            warn!("CORS allows any origin in production");
        }

        Ok(())
    }

    /// Human-readable configuration summary for startup logs (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Palmr Gateway Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Upstream: {}\n\
             - Upstream Timeout: {}s\n\
             - Token Lifetime / Margin: {}s / {}s\n\
             - Retry On Unauthorized: {}\n\
             - Admin Credentials: {}",
            self.http_host,
            self.http_port,
            self.environment,
            self.log_level,
            if self.database.url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.upstream.base_url,
            self.upstream.request_timeout.as_secs(),
            self.upstream.token_lifetime_secs,
            self.upstream.token_safety_margin_secs,
            self.upstream.retry_on_unauthorized,
            if self.vault.require_admin_credentials().is_ok() {
                "Configured"
            } else {
                "Missing"
            },
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("Invalid {key} value: '{raw}'")),
        },
        Err(_) => Ok(default),
    }
}
