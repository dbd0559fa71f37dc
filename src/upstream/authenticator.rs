// ABOUTME: Admin login against the upstream identity API with token caching
// ABOUTME: Reads the token from the JSON body or a Set-Cookie attribute and fills the TokenCache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Admin Authenticator
//!
//! [`AdminAuthenticator::authenticate`] resolves to a usable admin token or a
//! typed [`AuthError`]:
//!
//! 1. A cached token valid beyond the safety margin is returned with no
//!    decryption and no network call.
//! 2. Otherwise credentials are decrypted; a vault failure aborts before
//!    any request is sent.
//! 3. `POST {base}/auth/login` with `{emailOrUsername, password}`.
//! 4. On 200 the token comes from the JSON `token` field, or failing that
//!    from the first `token=` attribute of a `Set-Cookie` header.
//! 5. The token is cached with the upstream-declared lifetime when one is
//!    present (`expiresIn` or cookie `Max-Age`), else the assumed lifetime.
//!
//! Failed attempts never touch the cache.

use super::cookie;
use super::token_cache::TokenCache;
use crate::config::UpstreamConfig;
use crate::constants::{defaults, upstream};
use crate::crypto::{CredentialVault, EncryptedAdminCredentials};
use crate::errors::AuthError;
use crate::logging::AppLogger;
use crate::models::{AdminCredentials, AdminToken};
use chrono::{DateTime, Duration, Utc};
use reqwest::header::SET_COOKIE;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Lifetime assumptions for admin tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    /// Assumed lifetime when upstream does not declare one
    pub lifetime: Duration,
    /// Tokens within this margin of expiry are not handed out
    pub safety_margin: Duration,
}

impl TokenPolicy {
    /// Policy from upstream configuration
    #[must_use]
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            lifetime: config.token_lifetime(),
            safety_margin: config.token_safety_margin(),
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            lifetime: Duration::seconds(defaults::ADMIN_TOKEN_LIFETIME_SECS),
            safety_margin: Duration::seconds(defaults::ADMIN_TOKEN_SAFETY_MARGIN_SECS),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email_or_username: &'a str,
    password: &'a str,
}

/// Obtains and caches the shared upstream admin token
pub struct AdminAuthenticator {
    http: Client,
    login_url: String,
    credentials: EncryptedAdminCredentials,
    vault: Arc<dyn CredentialVault>,
    cache: TokenCache,
    policy: TokenPolicy,
}

impl AdminAuthenticator {
    /// Create an authenticator for the API at `base_url`
    pub fn new(
        http: Client,
        base_url: &str,
        credentials: EncryptedAdminCredentials,
        vault: Arc<dyn CredentialVault>,
        cache: TokenCache,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            http,
            login_url: format!("{}{}", base_url.trim_end_matches('/'), upstream::LOGIN_PATH),
            credentials,
            vault,
            cache,
            policy,
        }
    }

    /// The cache this authenticator fills
    #[must_use]
    pub const fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Active token policy
    #[must_use]
    pub const fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Return a usable admin token, logging in if the cache cannot supply one
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` describing why no token could be obtained
    #[instrument(skip(self), name = "admin_authenticate")]
    pub async fn authenticate(&self) -> Result<AdminToken, AuthError> {
        if let Some(token) = self
            .cache
            .valid_token(Utc::now(), self.policy.safety_margin)
            .await
        {
            debug!("Using cached admin token");
            return Ok(token);
        }

        let credentials = self.credentials.decrypt(self.vault.as_ref()).map_err(|e| {
            warn!(error = %e, "Admin credentials could not be decrypted");
            AuthError::CredentialUnavailable(e.to_string())
        })?;

        let (value, expires_at) = self.login(&credentials).await?;
        drop(credentials);

        info!(token_len = value.len(), expires_at = %expires_at, "Admin login succeeded");
        Ok(self.cache.set(value, expires_at).await)
    }

    /// Evict `token` from the cache if it is still the cached one
    ///
    /// Call after upstream rejects the token so the next `authenticate`
    /// performs a fresh login.
    pub async fn invalidate(&self, token: &AdminToken) -> bool {
        self.cache.invalidate_if_matches(token.value()).await
    }

    async fn login(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let started = Instant::now();
        let response = self
            .http
            .post(&self.login_url)
            .json(&LoginRequest {
                email_or_username: credentials.username(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(|e| {
                AppLogger::log_upstream_call(upstream::LOGIN_PATH, None, started.elapsed());
                classify_transport_error(&e)
            })?;

        let status = response.status();
        AppLogger::log_upstream_call(
            upstream::LOGIN_PATH,
            Some(status.as_u16()),
            started.elapsed(),
        );

        if status != StatusCode::OK {
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                AppLogger::log_security_event(
                    "admin_login_rejected",
                    &format!("{} refused the stored admin credentials", upstream::SERVICE_NAME),
                );
            }
            return Err(AuthError::UpstreamRejected(status.as_u16()));
        }

        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_owned)
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let issued_at = Utc::now();
        extract_token(&body, &cookies, issued_at, self.policy.lifetime)
            .ok_or(AuthError::MalformedResponse)
    }
}

/// Token and expiry from a successful login response
///
/// The JSON body wins over cookies; a body that is empty or not JSON simply
/// yields no JSON token.
fn extract_token(
    body: &[u8],
    cookies: &[String],
    issued_at: DateTime<Utc>,
    assumed_lifetime: Duration,
) -> Option<(String, DateTime<Utc>)> {
    let json: Option<Value> = serde_json::from_slice(body).ok();

    let from_json = json.as_ref().and_then(|json| {
        let token = json
            .get(upstream::TOKEN_FIELD)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())?;
        let declared = json
            .get(upstream::EXPIRES_IN_FIELD)
            .and_then(Value::as_i64)
            .filter(|secs| *secs > 0);
        Some((token.to_owned(), declared))
    });

    let (token, declared_secs) = from_json.or_else(|| {
        cookies.iter().find_map(|header| {
            cookie::find_attribute(header, upstream::TOKEN_FIELD)
                .filter(|t| !t.is_empty())
                .map(|t| (t.to_owned(), cookie::max_age(header)))
        })
    })?;

    // A declared lifetime chrono cannot represent falls back to the assumed one
    let expires_at = declared_secs
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .or_else(|| issued_at.checked_add_signed(assumed_lifetime))?;
    Some((token, expires_at))
}

fn classify_transport_error(error: &reqwest::Error) -> AuthError {
    if error.is_timeout() {
        warn!("Upstream login timed out");
        AuthError::Timeout
    } else if error.is_connect() {
        warn!(error = %error, "Upstream login connection failed");
        AuthError::ConnectionFailed(error.to_string())
    } else {
        warn!(error = %error, "Upstream login transport error");
        AuthError::Transport(error.to_string())
    }
}
