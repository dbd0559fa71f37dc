// ABOUTME: Structured error types for local user store operations
// ABOUTME: Separates identity conflicts from infrastructure failures for the orchestrator

//! Database error types
//!
//! The registration flow treats a duplicate identity key very differently
//! from an infrastructure failure, so the two never share a variant.

use uuid::Uuid;

/// Errors raised by the local user store
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A record with the requested key does not exist
    #[error("{entity} with ID '{id}' not found")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Requested identifier
        id: Uuid,
    },

    /// A unique identity key (username or email) is already taken
    #[error("Unique constraint violated on {field}")]
    Conflict {
        /// Name of the conflicting column
        field: &'static str,
    },

    /// Connection could not be established or was lost
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// A statement or commit failed
    #[error("Database query failed: {0}")]
    Query(String),

    /// Stored data could not be mapped back into a model
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl DatabaseError {
    /// Create a "not found" error for a user record
    #[must_use]
    pub const fn user_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "User", id }
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                let message = db_error.message();
                let field = if message.contains("users.email") {
                    "email"
                } else {
                    "username"
                };
                Self::Conflict { field }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connection(error.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::InvalidData(error.to_string())
            }
            _ => Self::Query(error.to_string()),
        }
    }
}
