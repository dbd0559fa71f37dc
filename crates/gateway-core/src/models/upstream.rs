// ABOUTME: Upstream registration payload and the closed set of classified outcomes
// ABOUTME: Maps HTTP statuses from the Palmr register endpoint into UpstreamOutcome

use serde::Serialize;
use std::fmt;

/// Account payload sent to the upstream register endpoint
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    /// Given name (first word of the display name)
    pub first_name: String,
    /// Remainder of the display name, possibly empty
    pub last_name: String,
    /// Unique username
    pub username: String,
    /// Normalized (lowercase) email
    pub email: String,
    /// Plaintext password, forwarded once over the upstream connection
    pub password: String,
    /// Optional avatar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl UserRegistration {
    /// Build the payload from an undivided display name
    ///
    /// The name is split at the first space: `"Jane van Doe"` becomes
    /// `("Jane", "van Doe")`; a single word leaves `last_name` empty.
    #[must_use]
    pub fn from_display_name(
        name: &str,
        username: &str,
        email: &str,
        password: &str,
        image: Option<String>,
    ) -> Self {
        let (first_name, last_name) = name.split_once(' ').unwrap_or((name, ""));
        Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            image: image.filter(|i| !i.is_empty()),
        }
    }
}

impl fmt::Debug for UserRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegistration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("image", &self.image)
            .finish()
    }
}

/// Classified result of an upstream registration call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// 200 / 201
    Created,
    /// 409, the account already exists upstream
    Conflict,
    /// 400 / 422
    Invalid,
    /// 401 / 403, the admin token was rejected
    Unauthorized,
    /// Any 5xx
    UpstreamServerError(u16),
    /// Timeout or connection failure
    Unreachable,
}

impl UpstreamOutcome {
    /// Classify an HTTP status; `None` for statuses outside the known set
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            200 | 201 => Some(Self::Created),
            409 => Some(Self::Conflict),
            400 | 422 => Some(Self::Invalid),
            401 | 403 => Some(Self::Unauthorized),
            500..=599 => Some(Self::UpstreamServerError(status)),
            _ => None,
        }
    }
}

impl fmt::Display for UpstreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Conflict => write!(f, "conflict"),
            Self::Invalid => write!(f, "invalid"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::UpstreamServerError(status) => write!(f, "upstream server error ({status})"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}
