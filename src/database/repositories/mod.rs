// ABOUTME: Repository traits decoupling the orchestrator and routes from the concrete store
// ABOUTME: UserRepository is implemented by the SQLite Database and by test doubles

use crate::errors::DatabaseError;
use crate::models::{NewUser, User, UserUpdate};
use async_trait::async_trait;
use uuid::Uuid;

/// SQLite implementation of `UserRepository`
pub mod user_repository;

/// Keyed store of local user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken username or email is `DatabaseError::Conflict`
    async fn create(&self, user: &NewUser) -> Result<User, DatabaseError>;

    /// First record whose username or email matches
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DatabaseError>;

    /// Record by id
    async fn get(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// All records, oldest first
    async fn list_all(&self) -> Result<Vec<User>, DatabaseError>;

    /// Apply a partial update and return the new record
    async fn update(&self, id: Uuid, update: &UserUpdate) -> Result<User, DatabaseError>;

    /// Remove a record
    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;

    /// Flag a record as mirrored upstream
    async fn mark_upstream_synced(&self, id: Uuid) -> Result<(), DatabaseError>;
}
