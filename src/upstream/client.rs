// ABOUTME: Upstream account creation authenticated with the shared admin token
// ABOUTME: Classifies register responses into the closed UpstreamOutcome set

use super::authenticator::AdminAuthenticator;
use crate::constants::upstream;
use crate::errors::ClientError;
use crate::logging::AppLogger;
use crate::models::{AdminToken, UpstreamOutcome, UserRegistration};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{instrument, warn};

/// Creates accounts on the upstream identity API
pub struct RegistrationClient {
    http: Client,
    register_url: String,
    authenticator: Arc<AdminAuthenticator>,
    rejected_token: Mutex<Option<AdminToken>>,
}

impl RegistrationClient {
    /// Create a client for the API at `base_url`
    pub fn new(http: Client, base_url: &str, authenticator: Arc<AdminAuthenticator>) -> Self {
        Self {
            http,
            register_url: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                upstream::REGISTER_PATH
            ),
            authenticator,
            rejected_token: Mutex::new(None),
        }
    }

    /// Register `payload` upstream
    ///
    /// Transport failures are reported as `UpstreamOutcome::Unreachable`.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotAuthenticated` if no admin token could be obtained;
    ///   no registration request is sent in that case
    /// - `ClientError::UnexpectedStatus` for statuses outside the classification
    #[instrument(skip_all, fields(username = %payload.username))]
    pub async fn register(&self, payload: &UserRegistration) -> Result<UpstreamOutcome, ClientError> {
        let token = self
            .authenticator
            .authenticate()
            .await
            .map_err(ClientError::NotAuthenticated)?;

        let started = Instant::now();
        let response = match self
            .http
            .post(&self.register_url)
            .bearer_auth(token.value())
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                AppLogger::log_upstream_call(upstream::REGISTER_PATH, None, started.elapsed());
                warn!(error = %e, timeout = e.is_timeout(), "Upstream registration unreachable");
                return Ok(UpstreamOutcome::Unreachable);
            }
        };

        let status = response.status().as_u16();
        AppLogger::log_upstream_call(upstream::REGISTER_PATH, Some(status), started.elapsed());

        let outcome = UpstreamOutcome::from_status(status).ok_or_else(|| {
            warn!(status, "Upstream registration returned an unclassified status");
            ClientError::UnexpectedStatus(status)
        })?;

        if outcome == UpstreamOutcome::Unauthorized {
            *self.rejected_token.lock().await = Some(token);
        }

        Ok(outcome)
    }

    /// Evict the most recently rejected admin token from the cache
    ///
    /// Returns whether a cached token was evicted. Only tokens upstream has
    /// answered 401/403 for are ever evicted here.
    pub async fn invalidate_token(&self) -> bool {
        let rejected = self.rejected_token.lock().await.take();
        match rejected {
            Some(token) => self.authenticator.invalidate(&token).await,
            None => false,
        }
    }
}
