// ABOUTME: User record repository over the SQLite pool
// ABOUTME: Writes are single statements; UNIQUE violations map to conflicts and rows map back to User

use super::UserRepository;
use crate::database::Database;
use crate::errors::DatabaseError;
use crate::models::{NewUser, User, UserUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

const SELECT_USER: &str = "SELECT id, name, username, email, password_hash, upstream_synced, \
                           created_at, updated_at FROM users";

fn row_to_user(row: &SqliteRow) -> Result<User, DatabaseError> {
    let id: String = row.try_get("id")?;
    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| DatabaseError::InvalidData(format!("user id '{id}': {e}")))?,
        name: row.try_get("name")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        upstream_synced: row.try_get("upstream_synced")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for Database {
    async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let user = user.clone().into_user();

        sqlx::query(
            r"
            INSERT INTO users (id, name, username, email, password_hash, upstream_synced, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.upstream_synced)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await?;

        debug!(user_id = %user.id, username = %user.username, "User record inserted");
        Ok(user)
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let query = format!("{SELECT_USER} WHERE username = $1 OR email = $2 ORDER BY created_at LIMIT 1");
        let row = sqlx::query(&query)
            .bind(username)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let query = format!("{SELECT_USER} WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, DatabaseError> {
        let query = format!("{SELECT_USER} ORDER BY created_at, username");
        sqlx::query(&query)
            .fetch_all(self.pool())
            .await?
            .iter()
            .map(row_to_user)
            .collect()
    }

    async fn update(&self, id: Uuid, update: &UserUpdate) -> Result<User, DatabaseError> {
        let mut user = self
            .get(id)
            .await?
            .ok_or_else(|| DatabaseError::user_not_found(id))?;
        update.apply_to(&mut user);

        let result = sqlx::query(
            "UPDATE users SET name = $1, username = $2, email = $3, updated_at = $4 WHERE id = $5",
        )
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.updated_at)
        .bind(id.to_string())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::user_not_found(id));
        }
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_string())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::user_not_found(id));
        }
        Ok(())
    }

    async fn mark_upstream_synced(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("UPDATE users SET upstream_synced = true, updated_at = $1 WHERE id = $2")
                .bind(Utc::now())
                .bind(id.to_string())
                .execute(self.pool())
                .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::user_not_found(id));
        }
        Ok(())
    }
}
