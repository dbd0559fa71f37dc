// ABOUTME: Process-wide single-slot cache for the shared upstream admin token
// ABOUTME: Whole-value replacement under a short RwLock write; reads hand out copies

use crate::models::AdminToken;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared admin token slot
///
/// Clones share the same slot. The lock guards only in-memory reads and
/// writes; it is never held while a request is in flight.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    slot: Arc<RwLock<Option<AdminToken>>>,
}

impl TokenCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the cached token, valid or not
    pub async fn get(&self) -> Option<AdminToken> {
        self.slot.read().await.clone()
    }

    /// Replace the cached token; value and expiry change together
    pub async fn set(&self, value: impl Into<String>, expires_at: DateTime<Utc>) -> AdminToken {
        let token = AdminToken::new(value, expires_at);
        *self.slot.write().await = Some(token.clone());
        debug!(expires_at = %expires_at, "Admin token cached");
        token
    }

    /// Drop the cached token unconditionally
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    /// Drop the cached token only if it is still `value`
    ///
    /// Returns whether the slot was cleared. A token written by a concurrent
    /// refresh after `value` was rejected is left in place.
    pub async fn invalidate_if_matches(&self, value: &str) -> bool {
        let mut slot = self.slot.write().await;
        if slot.as_ref().is_some_and(|token| token.value() == value) {
            *slot = None;
            debug!("Rejected admin token evicted from cache");
            true
        } else {
            false
        }
    }

    /// Whether `token` may be handed out at `now`
    #[must_use]
    pub fn is_valid(token: &AdminToken, now: DateTime<Utc>, safety_margin: Duration) -> bool {
        token.is_valid_at(now, safety_margin)
    }

    /// Copy of the cached token if it is usable at `now`
    pub async fn valid_token(
        &self,
        now: DateTime<Utc>,
        safety_margin: Duration,
    ) -> Option<AdminToken> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|token| Self::is_valid(token, now, safety_margin))
            .cloned()
    }
}
