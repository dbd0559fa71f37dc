// ABOUTME: Admin session token and plaintext admin credential types
// ABOUTME: Both redact their secret parts in Debug output; credentials zeroize on drop

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bearer token the gateway uses for privileged upstream calls
///
/// `value` and `expires_at` are always set together; a token is replaced
/// wholesale, never mutated in place.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AdminToken {
    /// Create a token expiring at `expires_at`
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// The opaque bearer value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// When the token stops being accepted
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Usable only if `now + safety_margin < expires_at`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, safety_margin: Duration) -> bool {
        now + safety_margin < self.expires_at
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminToken")
            .field("value", &format_args!("<redacted {} chars>", self.value.len()))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Plaintext admin login, derived per attempt from the vault and never cached
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    /// Wrap decrypted credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Admin username or email
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Admin password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
