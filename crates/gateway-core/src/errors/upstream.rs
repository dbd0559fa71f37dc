// ABOUTME: Error types for the admin login and upstream registration calls
// ABOUTME: Every failure branch of the Palmr integration resolves to one of these variants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Upstream Error Types
//!
//! - `AuthError` - obtaining the shared admin token failed
//! - `ClientError` - the registration call could not be classified as an outcome

/// Failure to obtain an admin token from the upstream login endpoint
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Stored admin credentials could not be decrypted; no request was sent
    #[error("Admin credentials unavailable: {0}")]
    CredentialUnavailable(String),

    /// Upstream answered the login with a non-200 status
    #[error("Upstream rejected admin login with status {0}")]
    UpstreamRejected(u16),

    /// Upstream answered 200 without a token in the body or cookies
    #[error("Upstream login response did not contain a token")]
    MalformedResponse,

    /// Login call exceeded the configured timeout
    #[error("Upstream login timed out")]
    Timeout,

    /// Upstream could not be connected to
    #[error("Could not connect to upstream: {0}")]
    ConnectionFailed(String),

    /// Any other transport failure (e.g. the body could not be read)
    #[error("Upstream transport error: {0}")]
    Transport(String),
}

impl AuthError {
    /// Whether the next caller may succeed simply by trying again
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ConnectionFailed(_) | Self::Transport(_)
        )
    }
}

/// Failure of the upstream registration call that is not a classified outcome
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// No admin token could be obtained, so no registration call was made
    #[error("Not authenticated with upstream: {0}")]
    NotAuthenticated(#[source] AuthError),

    /// Upstream answered with a status outside the known classification
    #[error("Unexpected upstream status {0}")]
    UnexpectedStatus(u16),
}
