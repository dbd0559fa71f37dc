// ABOUTME: Local user record types for the gateway's own user store
// ABOUTME: User (persisted), NewUser (insert), and UserUpdate (partial edit)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A locally persisted user; `username` and `email` are unique in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Identity key
    pub id: Uuid,
    /// Undivided display name
    pub name: String,
    /// Unique username
    pub username: String,
    /// Unique, lowercase email
    pub email: String,
    /// bcrypt hash of the password; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account has been mirrored upstream
    pub upstream_synced: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Password hash (empty for users created without a password)
    pub password_hash: String,
}

impl NewUser {
    /// Materialize the record with a fresh id and timestamps
    #[must_use]
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: self.name,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            upstream_synced: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    /// New display name
    pub name: Option<String>,
    /// New username
    pub username: Option<String>,
    /// New email
    pub email: Option<String>,
}

impl UserUpdate {
    /// Apply the present fields onto `user`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        user.updated_at = Utc::now();
    }
}
