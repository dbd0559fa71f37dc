// ABOUTME: Registration input validation with configurable minimum lengths
// ABOUTME: Normalizes fields (trim, lowercase email) and reports the first failing rule

use crate::config::RegistrationConfig;
use crate::constants::{limits, messages};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;
use zeroize::Zeroizing;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Raw registration body
///
/// Every field is optional here so that a missing field surfaces as a
/// validation message instead of a deserialization failure.
#[derive(Clone, Default, Deserialize)]
pub struct RegistrationRequest {
    /// Display name
    pub name: Option<String>,
    /// Username
    pub username: Option<String>,
    /// Email
    pub email: Option<String>,
    /// Plaintext password
    pub password: Option<String>,
    /// Optional avatar
    pub image: Option<String>,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("image", &self.image)
            .finish()
    }
}

/// Normalized registration fields that passed every rule
pub struct ValidatedRegistration {
    /// Trimmed display name
    pub name: String,
    /// Trimmed username
    pub username: String,
    /// Trimmed, lowercased email
    pub email: String,
    /// Password exactly as submitted
    pub password: Zeroizing<String>,
    /// Avatar, if a non-empty one was given
    pub image: Option<String>,
}

impl fmt::Debug for ValidatedRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedRegistration")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("image", &self.image)
            .finish()
    }
}

/// First rule a registration request failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One of name, username, email, password is absent
    #[error("{}", messages::REQUIRED_FIELDS)]
    MissingFields,
    /// Trimmed name below the minimum
    #[error("Name must be at least {0} characters long")]
    NameTooShort(usize),
    /// Trimmed username below the minimum
    #[error("Username must be at least {0} characters long")]
    UsernameTooShort(usize),
    /// Email blank after trimming
    #[error("{}", messages::EMAIL_REQUIRED)]
    EmailRequired,
    /// Password below the minimum
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    /// Email does not look like `local@domain.tld`
    #[error("{}", messages::INVALID_EMAIL)]
    InvalidEmail,
}

/// Minimum lengths, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Minimum name length
    pub min_name_length: usize,
    /// Minimum username length
    pub min_username_length: usize,
    /// Minimum password length; never below 6
    pub min_password_length: usize,
}

impl ValidationRules {
    /// Rules from configuration, with the password floor enforced
    #[must_use]
    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self {
            min_name_length: config.min_name_length,
            min_username_length: config.min_username_length,
            min_password_length: config.min_password_length.max(limits::MIN_PASSWORD_LENGTH),
        }
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_name_length: limits::MIN_NAME_LENGTH,
            min_username_length: limits::MIN_USERNAME_LENGTH,
            min_password_length: limits::MIN_PASSWORD_LENGTH,
        }
    }
}

/// Applies `ValidationRules` to registration requests
#[derive(Debug, Clone, Default)]
pub struct RegistrationValidator {
    rules: ValidationRules,
}

impl RegistrationValidator {
    /// Validator enforcing `rules`
    #[must_use]
    pub fn new(rules: ValidationRules) -> Self {
        Self {
            rules: ValidationRules {
                min_password_length: rules.min_password_length.max(limits::MIN_PASSWORD_LENGTH),
                ..rules
            },
        }
    }

    /// Active rules
    #[must_use]
    pub const fn rules(&self) -> ValidationRules {
        self.rules
    }

    /// Check presence, then lengths, then email shape
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` in that order
    pub fn validate(
        &self,
        request: &RegistrationRequest,
    ) -> Result<ValidatedRegistration, ValidationError> {
        let (Some(name), Some(username), Some(email), Some(password)) = (
            request.name.as_deref(),
            request.username.as_deref(),
            request.email.as_deref(),
            request.password.as_deref(),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        let name = name.trim();
        let username = username.trim();
        let email = email.trim().to_lowercase();

        if name.chars().count() < self.rules.min_name_length {
            return Err(ValidationError::NameTooShort(self.rules.min_name_length));
        }
        if username.chars().count() < self.rules.min_username_length {
            return Err(ValidationError::UsernameTooShort(self.rules.min_username_length));
        }
        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if password.chars().count() < self.rules.min_password_length {
            return Err(ValidationError::PasswordTooShort(self.rules.min_password_length));
        }
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(ValidatedRegistration {
            name: name.to_owned(),
            username: username.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
            image: request.image.clone().filter(|i| !i.trim().is_empty()),
        })
    }
}

/// Whether `email` has the `local@domain.tld` shape
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}
