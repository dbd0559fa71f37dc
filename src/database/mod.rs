// ABOUTME: Local user store backed by SQLite through sqlx
// ABOUTME: Owns the connection pool, schema migration, and the UserRepository implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Database Management
//!
//! The gateway keeps its own user records independent of upstream. Username
//! and email are unique at the schema level and every write is a single
//! statement, so a duplicate surfaces as a constraint violation that maps to
//! [`DatabaseError::Conflict`]. File databases run in WAL mode with a busy
//! timeout so concurrent registrations queue instead of failing.

/// Repository traits and their SQLite implementations
pub mod repositories;

pub use crate::errors::DatabaseError;
pub use repositories::UserRepository;

use crate::constants::defaults;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Database manager for the local user store
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to `database_url`, creating the file if needed, and migrate
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the database cannot be opened,
    /// or the migration fails
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        let in_memory = database_url.contains(":memory:");

        if !in_memory {
            ensure_parent_dir(database_url)?;
        }

        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DatabaseError::Connection(e.to_string()))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(defaults::SQLITE_BUSY_TIMEOUT_SECS));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to :memory: is a separate database
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(in_memory, "Local user store ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL DEFAULT '',
                upstream_synced BOOLEAN NOT NULL DEFAULT false,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check the pool can still serve a query
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn ensure_parent_dir(database_url: &str) -> Result<(), DatabaseError> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            DatabaseError::Connection(format!(
                "cannot create database directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}
